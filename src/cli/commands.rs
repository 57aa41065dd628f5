//! Command dispatch: wires CLI arguments to services

use std::io;
use std::path::PathBuf;

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::services::LayoutService;
use crate::application::{ApplicationError, LayoutController};
use crate::cli::args::{Cli, Commands, ConfigCommands, LayoutArgs, OutputFormat};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{
    global_config_dir, global_config_path, local_config_path, LayoutSettings, Settings,
    LOCAL_CONFIG_FILE,
};
use crate::domain::Identifier;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;
use crate::tree_traits::TreeNodeConvert;
use crate::util::path::expand_path;

/// Execute the parsed command.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Layout { layout, insert }) => cmd_layout(cli, layout, insert),
        Some(Commands::Measure { layout }) => cmd_measure(cli, layout),
        Some(Commands::Bound { layout }) => cmd_bound(cli, layout),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => cmd_completion(*shell),
        None => Ok(()),
    }
}

/// Explicit `--config`, else `./.treelayout.toml` when present.
fn local_config(cli: &Cli) -> CliResult<Option<PathBuf>> {
    if let Some(path) = &cli.config {
        return Ok(Some(expand_path(path)));
    }
    let cwd = std::env::current_dir().map_err(|e| InfraError::io("get current directory", e))?;
    let candidate = local_config_path(&cwd);
    Ok(candidate.exists().then_some(candidate))
}

fn create_container(cli: &Cli) -> CliResult<ServiceContainer> {
    let local = local_config(cli)?;
    let settings = Settings::load(local.as_deref())?;
    debug!("effective settings: {:?}", settings.layout);
    Ok(ServiceContainer::new(settings))
}

/// Command-line flags win over every config layer.
fn apply_overrides(settings: &LayoutSettings, args: &LayoutArgs) -> LayoutSettings {
    LayoutSettings {
        node_width: args.node_width.unwrap_or(settings.node_width),
        node_height: args.node_height.unwrap_or(settings.node_height),
        space_x: args.space_x.unwrap_or(settings.space_x),
        space_y: args.space_y.unwrap_or(settings.space_y),
        orientation: args.orientation.unwrap_or(settings.orientation),
    }
}

/// Parse `PARENT_ID=NAME`.
fn parse_insert(arg: &str) -> CliResult<(Identifier, String)> {
    match arg.split_once('=') {
        Some((parent, name)) if !parent.trim().is_empty() && !name.trim().is_empty() => {
            let parent = parent
                .trim()
                .parse::<Identifier>()
                .unwrap_or_else(|never| match never {});
            Ok((parent, name.trim().to_string()))
        }
        _ => Err(CliError::InvalidArgs(format!(
            "expected PARENT_ID=NAME, got '{arg}'"
        ))),
    }
}

/// Load the tree and build a controller from settings plus flags.
fn prepare(cli: &Cli, args: &LayoutArgs) -> CliResult<(LayoutService, LayoutController)> {
    let container = create_container(cli)?;
    let settings = apply_overrides(&container.settings.layout, args);
    let path = expand_path(&args.file);

    let root = container.layout.load_tree(&path)?;
    let controller = container.layout.controller(root, &settings)?;
    Ok((container.layout, controller))
}

fn print_json<T: serde::Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| {
        InfraError::io("serialize output", io::Error::new(io::ErrorKind::Other, e))
    })?;
    output::info(&json);
    Ok(())
}

#[instrument(level = "debug", skip(cli))]
fn cmd_layout(cli: &Cli, args: &LayoutArgs, insert: &[String]) -> CliResult<()> {
    let (service, mut controller) = prepare(cli, args)?;

    for arg in insert {
        let (parent, name) = parse_insert(arg)?;
        let node = service.insert_node(&mut controller, &parent, &name)?;
        debug!("inserted {} under {}", node.id, parent);
    }

    let report = LayoutService::report(&controller)
        .ok_or_else(|| CliError::Usage("no tree loaded".to_string()))?;

    match args.format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Tree => {
            output::header(&format!(
                "{} layout, canvas {}x{}",
                report.orientation, report.bound.width, report.bound.height
            ));
            output::info(&report.root.to_tree_string());
            Ok(())
        }
    }
}

#[instrument(level = "debug", skip(cli))]
fn cmd_measure(cli: &Cli, args: &LayoutArgs) -> CliResult<()> {
    let (_, controller) = prepare(cli, args)?;
    let measured = controller
        .measured_root()
        .ok_or_else(|| CliError::Usage("no tree loaded".to_string()))?;

    match args.format {
        OutputFormat::Json => print_json(&*measured),
        OutputFormat::Tree => {
            output::info(&measured.to_tree_string());
            Ok(())
        }
    }
}

#[instrument(level = "debug", skip(cli))]
fn cmd_bound(cli: &Cli, args: &LayoutArgs) -> CliResult<()> {
    let (_, controller) = prepare(cli, args)?;
    let bound = controller
        .canvas_bound()
        .ok_or_else(|| CliError::Usage("no tree loaded".to_string()))?;

    match args.format {
        OutputFormat::Json => print_json(&bound),
        OutputFormat::Tree => {
            output::info(&format!("{}x{}", bound.width, bound.height));
            Ok(())
        }
    }
}

#[instrument(level = "debug", skip(cli))]
fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let container = create_container(cli)?;
            output::info(&container.settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::detail(&format!("global: {}", path.display())),
                None => output::detail(&"global: (no config directory)"),
            }
            let local = local_config(cli)?
                .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE));
            output::detail(&format!("local:  {}", local.display()));
            Ok(())
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_dir()
                    .map(|dir| dir.join("treelayout.toml"))
                    .ok_or_else(|| ApplicationError::Config {
                        message: "cannot determine config directory".to_string(),
                    })?
            } else {
                let cwd = std::env::current_dir()
                    .map_err(|e| InfraError::io("get current directory", e))?;
                local_config_path(&cwd)
            };

            if path.exists() {
                output::warning(&format!("config already exists: {}", path.display()));
                return Ok(());
            }

            let container = ServiceContainer::new(Settings::default());
            container
                .fs
                .ensure_parent(&path)
                .map_err(|e| InfraError::io(format!("create {}", path.display()), e))?;
            container
                .fs
                .write(&path, &Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::action("Created", &path.display());
            Ok(())
        }
    }
}

fn cmd_completion(shell: clap_complete::Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Orientation;

    fn layout_args() -> LayoutArgs {
        LayoutArgs {
            file: PathBuf::from("tree.json"),
            orientation: None,
            node_width: None,
            node_height: None,
            space_x: None,
            space_y: None,
            format: OutputFormat::Tree,
        }
    }

    #[test]
    fn given_insert_arg_when_parsing_then_splits_parent_and_name() {
        let (parent, name) = parse_insert("3=New Node").unwrap();
        assert_eq!(parent, Identifier::Int(3));
        assert_eq!(name, "New Node");

        let (parent, _) = parse_insert("abc=x").unwrap();
        assert_eq!(parent, Identifier::Str("abc".into()));
    }

    #[test]
    fn given_malformed_insert_arg_when_parsing_then_invalid_args() {
        for arg in ["3", "=x", "3=", ""] {
            assert!(
                matches!(parse_insert(arg), Err(CliError::InvalidArgs(_))),
                "{arg}"
            );
        }
    }

    #[test]
    fn given_flags_when_overriding_then_flags_win() {
        let settings = LayoutSettings::default();
        let args = LayoutArgs {
            space_x: Some(5.0),
            orientation: Some(Orientation::Vertical),
            ..layout_args()
        };

        let merged = apply_overrides(&settings, &args);

        assert_eq!(merged.space_x, 5.0);
        assert_eq!(merged.orientation, Orientation::Vertical);
        assert_eq!(merged.node_width, settings.node_width);
    }
}
