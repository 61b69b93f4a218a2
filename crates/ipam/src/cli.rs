//! Clap derive structures for the `ipam` CLI.
//!
//! Only depends on clap and clap_complete so `build.rs` can include it for
//! man page generation.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// ipam -- manage subnets, addresses and reservations on an IPAM server
#[derive(Debug, Parser)]
#[command(
    name = "ipam",
    version,
    about = "Manage IP address space from the command line",
    long_about = "Command-line client for the IPAM server.\n\n\
        Log in once with `ipam login`; the session token is kept in the\n\
        system keyring (or a file, see `token_store` in the config) and\n\
        revalidated on every run.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// API base URL, including the path prefix (e.g. https://ipam.example.net/api)
    #[arg(long, env = "IPAM_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format [default: table]
    #[arg(long, short = 'o', env = "IPAM_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "IPAM_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds [default: 30]
    #[arg(long, env = "IPAM_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

impl GlobalOpts {
    pub fn format(&self) -> OutputFormat {
        self.output.unwrap_or(OutputFormat::Table)
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Address status as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IpStatusArg {
    Available,
    Reserved,
    Assigned,
    Dhcp,
    Static,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    Admin,
    User,
    Readonly,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the session token
    Login(LoginArgs),

    /// Drop the session and remove the stored token
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Create an account (does not log in)
    Register(RegisterArgs),

    /// Update your own username or email
    Profile(ProfileArgs),

    /// Change your password
    Password,

    /// Dashboard summary: subnets and utilization totals
    #[command(alias = "ov")]
    Overview,

    /// Manage subnets
    #[command(alias = "sn")]
    Subnets(SubnetsArgs),

    /// Manage IP addresses
    #[command(alias = "ip")]
    Ips(IpsArgs),

    /// Manage address range reservations
    #[command(alias = "res")]
    Reservations(ReservationsArgs),

    /// Utilization and status reports
    Reports(ReportsArgs),

    /// Browse the address audit trail
    Audit(AuditArgs),

    /// Administer user accounts (admin only)
    Users(UsersArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AUTH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (prompted for when omitted)
    #[arg(long, short = 'e', env = "IPAM_EMAIL")]
    pub email: Option<String>,

    /// Password for non-interactive use
    #[arg(long, env = "IPAM_PASSWORD", hide = true, hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Username
    pub username: String,

    /// Email address
    pub email: String,

    /// Requested role (the server may ignore this)
    #[arg(long)]
    pub role: Option<RoleArg>,

    /// Password for non-interactive use
    #[arg(long, env = "IPAM_PASSWORD", hide = true, hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Debug, Args)]
pub struct ProfileArgs {
    /// New username
    #[arg(long)]
    pub username: Option<String>,

    /// New email address
    #[arg(long)]
    pub email: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SHARED
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Server-side pagination for list commands.
#[derive(Debug, Args)]
pub struct PageArgs {
    /// Page number (1-based)
    #[arg(long)]
    pub page: Option<u32>,

    /// Results per page
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SUBNETS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SubnetsArgs {
    #[command(subcommand)]
    pub command: SubnetsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SubnetsCommand {
    /// List subnets
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        page: PageArgs,

        /// Free-text search
        #[arg(long, short = 's')]
        search: Option<String>,

        /// Filter by location
        #[arg(long)]
        location: Option<String>,

        /// Filter by VLAN ID
        #[arg(long)]
        vlan: Option<u16>,

        /// Fetch utilization for subnets the list omits it for
        #[arg(long, short = 'u')]
        utilization: bool,
    },

    /// Show one subnet with utilization
    Get {
        /// Subnet ID
        id: String,
    },

    /// Create a subnet from CIDR notation
    Create {
        /// Network in CIDR notation (e.g. 10.20.0.0/24)
        cidr: String,

        #[arg(long, short = 'd')]
        description: Option<String>,

        #[arg(long)]
        vlan: Option<u16>,

        #[arg(long)]
        location: Option<String>,

        /// Parent subnet ID
        #[arg(long)]
        parent: Option<String>,
    },

    /// Update a subnet
    Update {
        /// Subnet ID
        id: String,

        /// New network in CIDR notation
        #[arg(long)]
        cidr: Option<String>,

        #[arg(long, short = 'd')]
        description: Option<String>,

        #[arg(long)]
        vlan: Option<u16>,

        #[arg(long)]
        location: Option<String>,

        /// Parent subnet ID
        #[arg(long)]
        parent: Option<String>,
    },

    /// Delete a subnet
    #[command(alias = "rm")]
    Delete {
        /// Subnet ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  IP ADDRESSES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct IpsArgs {
    #[command(subcommand)]
    pub command: IpsCommand,
}

/// Descriptive fields shared by `ips assign` and `ips update`.
#[derive(Debug, Args)]
pub struct IpFields {
    #[arg(long)]
    pub hostname: Option<String>,

    /// MAC address
    #[arg(long)]
    pub mac: Option<String>,

    /// Device name
    #[arg(long)]
    pub device: Option<String>,

    /// Person or team the address is assigned to
    #[arg(long)]
    pub assigned_to: Option<String>,

    #[arg(long, short = 'd')]
    pub description: Option<String>,

    #[arg(long)]
    pub status: Option<IpStatusArg>,
}

#[derive(Debug, Subcommand)]
pub enum IpsCommand {
    /// List IP addresses
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        page: PageArgs,

        /// Free-text search
        #[arg(long, short = 's')]
        search: Option<String>,

        #[arg(long)]
        status: Option<IpStatusArg>,

        /// Only addresses in this subnet
        #[arg(long)]
        subnet: Option<String>,
    },

    /// Show one address with its history
    Get {
        /// IP address record ID
        id: String,
    },

    /// Assign an address (the next free one unless --ip is given)
    Assign {
        /// Subnet ID
        #[arg(long)]
        subnet: String,

        /// Specific address to assign
        #[arg(long)]
        ip: Option<String>,

        #[command(flatten)]
        fields: IpFields,
    },

    /// Update an address record
    Update {
        /// IP address record ID
        id: String,

        #[command(flatten)]
        fields: IpFields,
    },

    /// Release an address back to the pool
    Release {
        /// IP address record ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RESERVATIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ReservationsArgs {
    #[command(subcommand)]
    pub command: ReservationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReservationsCommand {
    /// List reservations
    #[command(alias = "ls")]
    List {
        /// Only reservations in this subnet
        #[arg(long)]
        subnet: Option<String>,

        /// Free-text search
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Show one reservation
    Get {
        /// Reservation ID
        id: String,
    },

    /// Reserve an address range
    Create {
        /// Subnet ID
        #[arg(long)]
        subnet: String,

        /// First address of the range
        start: String,

        /// Last address of the range
        end: String,

        #[arg(long)]
        purpose: Option<String>,

        #[arg(long)]
        reserved_by: Option<String>,

        /// Expiry as RFC 3339 (e.g. 2026-12-31T00:00:00Z)
        #[arg(long)]
        expires: Option<String>,
    },

    /// Update a reservation
    Update {
        /// Reservation ID
        id: String,

        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,

        #[arg(long)]
        purpose: Option<String>,

        #[arg(long)]
        reserved_by: Option<String>,

        /// Expiry as RFC 3339
        #[arg(long)]
        expires: Option<String>,
    },

    /// Delete a reservation
    #[command(alias = "rm")]
    Delete {
        /// Reservation ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  REPORTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ReportsArgs {
    #[command(subcommand)]
    pub command: ReportsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReportsCommand {
    /// Per-subnet utilization with totals
    Utilization,

    /// Address counts per status
    Status,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AUDIT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AuditArgs {
    #[command(subcommand)]
    pub command: AuditCommand,
}

#[derive(Debug, Subcommand)]
pub enum AuditCommand {
    /// List audit entries, newest first
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        page: PageArgs,

        /// Filter by action (ASSIGN, RELEASE, UPDATE, ...)
        #[arg(long)]
        action: Option<String>,

        /// Only entries for this IP address record
        #[arg(long)]
        ip: Option<String>,

        /// Free-text search
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Show one audit entry with old and new values
    Get {
        /// Audit entry ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  USERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List all users
    #[command(alias = "ls")]
    List,

    /// Show one user
    Get {
        /// User ID
        id: String,
    },

    /// Create a user (password is prompted for)
    Create {
        username: String,

        email: String,

        #[arg(long)]
        role: Option<RoleArg>,
    },

    /// Update a user
    Update {
        /// User ID
        id: String,

        #[arg(long)]
        username: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        role: Option<RoleArg>,

        /// Prompt for a new password
        #[arg(long)]
        reset_password: bool,
    },

    /// Delete a user
    #[command(alias = "rm")]
    Delete {
        /// User ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// Set the API base URL
    SetUrl {
        /// e.g. https://ipam.example.net/api
        url: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
