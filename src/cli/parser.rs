use clap::{Parser, Subcommand, ValueEnum};

/// Command-line interface definition for rWorkClock
/// Work-session timer and monthly performance scoring on SQLite
#[derive(Parser)]
#[command(
    name = "rworkclock",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track work sessions, breaks and overtime per shift, and score monthly performance",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ShiftArg {
    Day,
    Night,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BreakAction {
    Start,
    End,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view, check or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'f', help = "Overwrite an existing backup file")]
        force: bool,
    },

    /// Assign a shift (or a day off) to an employee for one date
    Assign {
        employee: String,

        /// Date (YYYY-MM-DD)
        date: String,

        #[arg(long, value_enum, conflicts_with = "day_off", required_unless_present = "day_off")]
        shift: Option<ShiftArg>,

        #[arg(long = "day-off")]
        day_off: bool,
    },

    /// Assign the fallback shift for a whole month
    AssignMonth {
        employee: String,

        /// Month (YYYY-MM)
        month: String,

        #[arg(long, value_enum)]
        shift: ShiftArg,
    },

    /// Open a work session
    Checkin {
        employee: String,

        #[arg(long, value_name = "YYYY-MM-DD HH:MM", help = "Event time (default: now)")]
        at: Option<String>,
    },

    /// Start or end a break
    Break {
        employee: String,

        #[arg(value_enum)]
        action: BreakAction,

        #[arg(long, value_name = "YYYY-MM-DD HH:MM", help = "Event time (default: now)")]
        at: Option<String>,
    },

    /// Close the open work session and score it
    Checkout {
        employee: String,

        #[arg(long, value_name = "YYYY-MM-DD HH:MM", help = "Event time (default: now)")]
        at: Option<String>,
    },

    /// Show the live state of an employee's session
    Status {
        employee: String,

        #[arg(long, value_name = "YYYY-MM-DD HH:MM", help = "Evaluate at this time (default: now)")]
        at: Option<String>,

        #[arg(long, help = "Print machine-readable JSON")]
        json: bool,
    },

    /// Force-close sessions left open past the daily boundary
    Boundary {
        #[arg(long, value_name = "YYYY-MM-DD HH:MM", help = "Evaluate at this time (default: now)")]
        at: Option<String>,
    },

    /// Refresh the live clock every tick until interrupted
    Watch {
        employee: String,

        #[arg(long, help = "Stop after this many ticks")]
        ticks: Option<u64>,
    },

    /// Monthly performance report
    Report {
        #[arg(long, short = 'e')]
        employee: Option<String>,

        #[arg(long, short = 'm', value_name = "YYYY-MM")]
        month: Option<String>,

        #[arg(long, help = "Print machine-readable JSON")]
        json: bool,
    },

    /// Rebuild a monthly record from the stored sessions
    Replay {
        employee: String,

        /// Month (YYYY-MM)
        month: String,
    },

    /// Apply scores that previously failed to update the monthly record
    Retry { employee: String },
}

impl From<ShiftArg> for crate::models::shift::ShiftType {
    fn from(arg: ShiftArg) -> Self {
        match arg {
            ShiftArg::Day => Self::Day,
            ShiftArg::Night => Self::Night,
        }
    }
}
