//! Command-line front end.
//!
//! `play` puts a human in seat 0 with the greedy agent in the other seats;
//! `simulate` runs many episodes with a scripted policy under the
//! difficulty curriculum and reports the win rate.

use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use the_game::agents::{GreedyPolicy, Policy, RandomPolicy};
use the_game::core::{GameConfig, GameRng, GameSetup, Outcome, PlayAction, PlayerId};
use the_game::curriculum::{DifficultyConfig, DifficultyController};
use the_game::env::{Environment, Observation};
use the_game::training::{EpisodeRunner, RunnerConfig};

#[derive(Parser)]
#[command(name = "the-game")]
#[command(about = "Play or simulate the cooperative card game \"The Game\"")]
struct Args {
    /// Table configuration (JSON `GameConfig`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand)]
enum Mode {
    /// Play as player 0 alongside greedy agents
    Play {
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Deck difficulty in [0, 1]; 1 uses the full deck
        #[arg(long, default_value_t = 1.0)]
        difficulty: f64,

        /// Start from a scripted position (JSON `GameSetup`)
        #[arg(long)]
        setup: Option<PathBuf>,
    },

    /// Run episodes with a scripted policy
    Simulate {
        /// Number of episodes to simulate
        #[arg(short, long, default_value_t = 100)]
        episodes: u64,

        #[arg(long, value_enum, default_value = "greedy")]
        policy: PolicyKind,

        /// Seed of the first episode; episode i uses seed + i
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Starting difficulty
        #[arg(long, default_value_t = 0.0)]
        difficulty: f64,

        /// Cumulative wins per difficulty step
        #[arg(long, default_value_t = 10)]
        wins_per_step: u32,
    },
}

#[derive(Debug, Clone, ValueEnum)]
enum PolicyKind {
    Greedy,
    Random,
}

impl PolicyKind {
    fn build(&self) -> Box<dyn Policy> {
        match self {
            PolicyKind::Greedy => Box::new(GreedyPolicy),
            PolicyKind::Random => Box::new(RandomPolicy),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match &args.config {
        Some(path) => read_json::<GameConfig>(path)?,
        None => GameConfig::default(),
    };

    match args.mode {
        Mode::Play {
            seed,
            difficulty,
            setup,
        } => {
            let mut env = Environment::new(config, DifficultyConfig::default())?;
            match setup {
                Some(path) => {
                    let setup = read_json::<GameSetup>(&path)?;
                    env.load(&setup, seed)?;
                }
                None => {
                    env.reset(seed, difficulty)?;
                }
            }
            play(&mut env, seed)
        }
        Mode::Simulate {
            episodes,
            policy,
            seed,
            difficulty,
            wins_per_step,
        } => {
            let curriculum = DifficultyConfig::default()
                .with_initial(difficulty)
                .with_wins_per_step(wins_per_step);
            simulate(config, curriculum, episodes, &*policy.build(), seed)
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, Box<dyn Error>> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

// =============================================================================
// Simulate
// =============================================================================

fn simulate(
    config: GameConfig,
    curriculum: DifficultyConfig,
    episodes: u64,
    policy: &dyn Policy,
    seed: u64,
) -> Result<(), Box<dyn Error>> {
    let mut controller = DifficultyController::new(curriculum.clone())?;
    let env = Environment::new(config, curriculum)?;
    let mut runner = EpisodeRunner::new(env, RunnerConfig::default().with_seed_offset(seed));

    info!(episodes, policy = policy.name(), "starting simulation");
    let start = Instant::now();
    let summary = runner.play_episodes(episodes, policy, &mut controller)?;
    let elapsed = start.elapsed();

    println!("Policy:            {}", policy.name());
    println!("Episodes:          {}", summary.episodes);
    println!(
        "Won / lost / cut:  {} / {} / {}",
        summary.wins, summary.losses, summary.truncated
    );
    println!("Win rate:          {:.1}%", 100.0 * summary.win_rate());
    println!("Mean reward:       {:.2}", summary.mean_reward());
    println!("Final difficulty:  {:.2}", summary.final_difficulty);
    println!(
        "Time:              {:.2}s ({:.0} episodes/s)",
        elapsed.as_secs_f64(),
        summary.episodes as f64 / elapsed.as_secs_f64().max(1e-9)
    );
    Ok(())
}

// =============================================================================
// Play
// =============================================================================

const HUMAN: PlayerId = PlayerId::new(0);

fn play(env: &mut Environment, seed: u64) -> Result<(), Box<dyn Error>> {
    let agent = GreedyPolicy;
    let mut rng = GameRng::new(seed).for_context("policy");
    let stdin = io::stdin();

    println!("You are {HUMAN}. Play every card together with the agents.");

    while !env.is_done() {
        let obs = env.observe();
        let player = PlayerId::new(obs.active_player as u8);

        let action = if player == HUMAN {
            render(env);
            match prompt(&mut stdin.lock(), &obs)? {
                Some(action) => action,
                None => {
                    println!("Thanks for playing!");
                    return Ok(());
                }
            }
        } else {
            agent.choose(&obs, &mut rng)
        };

        let out = env.step_action(action)?;
        match out.result.play() {
            Some(play) if player != HUMAN => println!(
                "{player} plays {} on pile {} ({} -> {})",
                play.card, play.pile_index, play.pile_before, play.card
            ),
            Some(play) if play.reverse => {
                println!("Reverse-ten! {} on pile {}", play.card, play.pile_index);
            }
            Some(_) => {}
            None => println!("That card can't go there."),
        }
    }

    render(env);
    match env.state().outcome() {
        Outcome::Won => println!("Every card played. You win!"),
        Outcome::Lost => println!(
            "{} is stuck with {} cards left in play. Game over.",
            env.state().current_player(),
            env.state().cards_remaining()
        ),
        Outcome::InProgress => {}
    }
    Ok(())
}

fn render(env: &Environment) {
    let state = env.state();

    println!("\n{}", "=".repeat(48));
    for (index, pile) in state.piles().iter().enumerate() {
        println!("  Pile {index}: [{pile}]");
    }
    println!(
        "Deck: {} cards | to play this turn: {}",
        state.deck_size(),
        state.cards_required()
    );
    for (player, hand) in state.hands().iter() {
        if player == HUMAN {
            println!("  {player} (you): {hand}");
        } else {
            println!("  {player}: {} cards", hand.len());
        }
    }
}

/// Ask for `<card_index> <pile_index>`. `None` means quit.
fn prompt(input: &mut impl BufRead, obs: &Observation) -> io::Result<Option<PlayAction>> {
    let cards: Vec<_> = obs.hand_cards().collect();
    let listing: Vec<String> = cards
        .iter()
        .enumerate()
        .map(|(index, card)| format!("[{index}] {card}"))
        .collect();
    println!("Your hand: {}", listing.join("  "));

    let legal = obs.legal_actions();
    if !legal.is_empty() {
        let plays: Vec<String> = legal
            .iter()
            .map(|a| format!("{}->{}", cards[a.card_index], a.pile_index))
            .collect();
        println!("Valid plays: {}", plays.join(", "));
    }

    loop {
        print!("card index and pile index (or q): ");
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            return Ok(None);
        }

        let numbers: Vec<usize> = line
            .split_whitespace()
            .filter_map(|part| part.parse().ok())
            .collect();
        match numbers.as_slice() {
            [card, pile] => return Ok(Some(PlayAction::new(*card, *pile))),
            _ => println!("Enter two numbers, e.g. `0 2`."),
        }
    }
}
