use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "recharge-admin", about = "Manage recharge/payment options and media uploads")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Read configuration from this file instead of the default locations.
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ListArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct AddArgs {
    /// Service name shown to users.
    #[arg(long)]
    pub name: String,

    /// Website URL opened when the option is clicked.
    #[arg(long)]
    pub url: String,

    /// Logo/image URL.
    #[arg(long, default_value = "")]
    pub image: String,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct UpdateArgs {
    /// Position of the option, as printed by `list`.
    pub index: usize,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub url: Option<String>,

    #[arg(long)]
    pub image: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RemoveArgs {
    /// Position of the option, as printed by `list`.
    pub index: usize,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct UploadArgs {
    pub path: String,

    /// Key prefix; defaults to `storage.default_folder`.
    #[arg(long)]
    pub folder: Option<String>,

    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct DeleteObjectArgs {
    /// Public URL returned by `upload`.
    pub url: String,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct FileInfoArgs {
    pub path: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the stored options.
    List(ListArgs),
    /// Append a new option.
    Add(AddArgs),
    /// Edit an existing option; omitted fields keep their value.
    Update(UpdateArgs),
    /// Delete an option.
    Remove(RemoveArgs),
    /// Upload a file to object storage and print its URL.
    Upload(UploadArgs),
    /// Delete an uploaded object by its URL.
    DeleteObject(DeleteObjectArgs),
    /// Show type and size details of a local file.
    FileInfo(FileInfoArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_update_with_partial_fields() {
        let args = Args::parse_from(["recharge-admin", "update", "2", "--name", "New"]);
        match args.command {
            Commands::Update(u) => {
                assert_eq!(u.index, 2);
                assert_eq!(u.name.as_deref(), Some("New"));
                assert!(u.url.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_delete_object_and_global_config() {
        let args = Args::parse_from([
            "recharge-admin",
            "delete-object",
            "https://cdn.example.com/uploads/1-a.png",
            "--config",
            "admin.toml",
        ]);
        assert_eq!(args.config.as_deref(), Some("admin.toml"));
        assert!(matches!(args.command, Commands::DeleteObject(_)));
    }
}
