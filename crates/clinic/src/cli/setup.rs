use clap::{Parser, Subcommand, ValueEnum};
use clinicapp::model::Role;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "clinic", bin_name = "clinic", version, disable_help_subcommand = true)]
#[command(about = "Medical center records on plain text files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory (overrides CLINIC_DATA_DIR and clinic.toml)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data: Option<PathBuf>,

    /// Sign in with this email for the current command
    #[arg(
        long,
        global = true,
        value_name = "EMAIL",
        requires = "login_password",
        help_heading = "Session"
    )]
    pub login: Option<String>,

    /// Password for --login
    #[arg(
        long,
        global = true,
        value_name = "PASSWORD",
        requires = "login",
        help_heading = "Session"
    )]
    pub login_password: Option<String>,

    /// Output format
    #[arg(
        long,
        global = true,
        value_enum,
        default_value_t = OutputMode::Text,
        help_heading = "Options"
    )]
    pub output: OutputMode,

    /// Verbose output (debug logs on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    Doctor,
    Patient,
    Administrator,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Doctor => Role::Doctor,
            RoleArg::Patient => Role::Patient,
            RoleArg::Administrator => Role::Administrator,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register and manage medical centers
    #[command(display_order = 1)]
    Center {
        #[command(subcommand)]
        action: CenterCommands,
    },

    /// Register and manage users
    #[command(display_order = 2)]
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Open, browse and edit case files
    #[command(display_order = 3)]
    Case {
        #[command(subcommand)]
        action: CaseCommands,
    },

    /// Check credentials given with --login/--login-password
    #[command(display_order = 10)]
    Login,

    /// Center statistics
    #[command(display_order = 11)]
    Stats {
        /// Center id (administrators always get their own)
        #[arg(long)]
        center: Option<u64>,
    },

    /// Show the resolved configuration
    #[command(display_order = 12)]
    Config,
}

#[derive(Subcommand, Debug)]
pub enum CenterCommands {
    /// Register a center
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        address: String,
        /// Eight digits
        #[arg(long)]
        phone: String,
    },

    /// List active centers
    #[command(alias = "ls")]
    List,

    /// Search by name or address
    Search { term: String },

    /// Show one center
    Show { id: u64 },

    /// Edit a center; omitted fields are kept
    Edit {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },

    /// Archive a center
    #[command(alias = "rm")]
    Delete { id: u64 },
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Register a user
    Create {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long, value_enum)]
        role: RoleArg,
        #[arg(long)]
        password: String,
        /// Center the user belongs to
        #[arg(long)]
        center: u64,
    },

    /// List active users
    #[command(alias = "ls")]
    List,

    /// Search by first name, last name or email
    Search { term: String },

    /// Show one user
    Show { id: u64 },

    /// Edit a user; omitted fields are kept
    Edit {
        id: u64,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },

    /// Archive a user
    #[command(alias = "rm")]
    Delete { id: u64 },

    /// List active doctors
    Doctors,

    /// List active patients
    Patients,
}

#[derive(Subcommand, Debug)]
pub enum CaseCommands {
    /// Open a case file (doctors only)
    Create {
        /// Patient id
        #[arg(long)]
        patient: u64,

        /// Clinical fields as field=value (e.g. diagnosis=Flu treatment="Rest")
        fields: Vec<String>,
    },

    /// List active case files
    #[command(alias = "ls")]
    List,

    /// Search diagnosis, treatment and observations
    Search { term: String },

    /// Show a case file in full
    Show { id: u64 },

    /// Edit clinical fields of your own case file (doctors only)
    Edit {
        id: u64,

        /// Clinical fields as field=value
        #[arg(required = true)]
        fields: Vec<String>,
    },

    /// Archive a case file (administrators only)
    #[command(alias = "rm")]
    Delete { id: u64 },

    /// Case files of a patient
    ByPatient { id: u64 },

    /// Case files written by a doctor
    ByDoctor { id: u64 },

    /// Case files of a center
    ByCenter { id: u64 },

    /// Your own case files
    Mine,
}
