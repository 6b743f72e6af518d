use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use pomo_ipc::{client, BreakPolicy, Command, Response, SettingsPatch};

#[derive(Parser)]
#[command(name = "pomoctl")]
#[command(about = "Control the pomo timer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start or resume the timer
    Start,
    /// Pause the timer
    Pause,
    /// Reset the current session
    Reset,
    /// Go back to the first work session of a fresh cycle
    ResetCycle,
    /// Skip to the next session
    Skip,
    /// Show the current session
    Status,
    /// Show lifetime statistics
    Stats,
    /// Clear lifetime statistics
    ClearStats,
    /// Change settings; only the flags you pass change anything
    Set {
        /// Work session length in minutes
        #[arg(long)]
        work: Option<u32>,
        /// Short break length in minutes
        #[arg(long)]
        short_break: Option<u32>,
        /// Long break length in minutes
        #[arg(long)]
        long_break: Option<u32>,
        /// Which break follows a completed work session
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,
        /// Start breaks automatically
        #[arg(long)]
        auto_break: Option<bool>,
        /// Start work sessions automatically
        #[arg(long)]
        auto_work: Option<bool>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Alternating,
    AlwaysShort,
    AlwaysLong,
}

impl From<PolicyArg> for BreakPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Alternating => BreakPolicy::Alternating,
            PolicyArg::AlwaysShort => BreakPolicy::AlwaysShort,
            PolicyArg::AlwaysLong => BreakPolicy::AlwaysLong,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Convert CLI command to IPC command
    let command = match cli.command {
        Commands::Start => Command::Start,
        Commands::Pause => Command::Pause,
        Commands::Reset => Command::Reset,
        Commands::ResetCycle => Command::ResetCycle,
        Commands::Skip => Command::Skip,
        Commands::Status => Command::Status,
        Commands::Stats => Command::Stats,
        Commands::ClearStats => Command::ClearStats,
        Commands::Set {
            work,
            short_break,
            long_break,
            policy,
            auto_break,
            auto_work,
        } => Command::UpdateSettings(SettingsPatch {
            work_mins: work,
            short_break_mins: short_break,
            long_break_mins: long_break,
            break_policy: policy.map(Into::into),
            auto_start_break: auto_break,
            auto_start_work: auto_work,
        }),
    };

    let response = client::send(command).await?;

    match response {
        Response::Ok => println!("OK"),
        Response::Status(snapshot) => {
            println!("State: {:?}", snapshot.phase);
            println!("Session: {}", snapshot.kind.label());
            println!(
                "Remaining: {:02}:{:02} / {:02}:{:02}",
                snapshot.remaining_secs / 60,
                snapshot.remaining_secs % 60,
                snapshot.total_secs / 60,
                snapshot.total_secs % 60
            );
        }
        Response::Stats(stats) => {
            println!("Completed sessions: {}", stats.completed_sessions);
            println!("Focused minutes: {}", stats.total_time_spent_secs / 60);
            println!("Session count: {}", stats.session_count);
        }
        Response::Error(e) => eprintln!("Error: {}", e),
    }

    Ok(())
}
