use std::io;
use std::path::Path;

use clap::CommandFactory;
use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, CheckboxTree, NodeView, TreeListener};
use crate::cli::args::{Cli, Commands, ConfigCommands, InputArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{NodePath, NodeValue};
use crate::tree_traits::TreeNodeConvert;

/// Reports controller events through tracing.
struct LoggingListener;

impl TreeListener for LoggingListener {
    fn on_row_activated(&mut self, node: &NodeView) {
        info!(path = %node.path, label = %node.label, "row activated");
    }

    fn on_selection_changed(&mut self, node: &NodeView) {
        info!(path = %node.path, label = %node.label, state = %node.state, "selection changed");
    }
}

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };
    let settings = Settings::load(cli.config.as_deref())?;
    debug!(?settings, "settings loaded");

    match command {
        Commands::Tree { input } => _tree(&settings, input),
        Commands::Selected { input, json } => _selected(&settings, input, *json),
        Commands::Columns { input, open } => _columns(&settings, input, open),
        Commands::Config { command } => _config(&settings, command),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

/// Reads the input file and replays the selection steps on a fresh controller.
#[instrument(level = "debug", skip(settings))]
pub fn load_tree(settings: &Settings, input: &InputArgs) -> CliResult<CheckboxTree> {
    let json = read_input(&input.file)?;
    let mut tree = CheckboxTree::with_listener(settings, Box::new(LoggingListener));
    tree.init_from_str(&json)?;

    if !input.select.is_empty() {
        let values: Vec<NodeValue> = input
            .select
            .iter()
            .map(|raw| NodeValue::parse_lenient(raw))
            .collect();
        tree.set_selected(&values)?;
    }
    for step in &input.toggle {
        tree.toggle(&step.path, step.checked)?;
    }
    Ok(tree)
}

fn read_input(path: &Path) -> CliResult<String> {
    std::fs::read_to_string(path).map_err(|e| CliError::io(format!("read {}", path.display()), e))
}

#[instrument(level = "debug", skip(settings))]
fn _tree(settings: &Settings, input: &InputArgs) -> CliResult<()> {
    let tree = load_tree(settings, input)?;
    for root in tree.tree()?.to_tree_strings() {
        print!("{}", root);
    }
    Ok(())
}

#[instrument(level = "debug", skip(settings))]
fn _selected(settings: &Settings, input: &InputArgs, json: bool) -> CliResult<()> {
    let tree = load_tree(settings, input)?;
    let selected = tree.get_selected()?;
    if json {
        let rendered =
            serde_json::to_string_pretty(&selected).map_err(|e| ApplicationError::OperationFailed {
                context: "serialize selection".to_string(),
                source: Box::new(e),
            })?;
        output::info(&rendered);
        return Ok(());
    }
    for node in &selected {
        output::info(&format!("{}\t{}\t{}", node.path, node.label, node.value));
    }
    Ok(())
}

#[instrument(level = "debug", skip(settings))]
fn _columns(settings: &Settings, input: &InputArgs, open: &[NodePath]) -> CliResult<()> {
    let mut tree = load_tree(settings, input)?;
    for path in open {
        tree.activate(path)?;
    }
    for column in tree.columns()? {
        match &column.parent {
            Some(parent) => output::header(&format!(
                "Column {} (children of {})",
                column.index, parent
            )),
            None => output::header(&format!("Column {}", column.index)),
        }
        for row in &column.rows {
            let more = if row.has_children { " >" } else { "" };
            output::detail(&format!(
                "{} {} {}{}",
                output::marker(row.state),
                row.path,
                row.label,
                more
            ));
        }
    }
    Ok(())
}

fn _config(settings: &Settings, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&settings.to_toml()?),
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => {
                return Err(CliError::Usage(
                    "cannot determine the global config directory".to_string(),
                ))
            }
        },
    }
    Ok(())
}
