//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod audit;
pub mod inventory;
pub mod onts;
pub mod ops;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;
use crate::runtime;

/// Run a command that needs the dispatcher.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    let rt = runtime::build(global)?;
    match cmd {
        Command::Read(args) => ops::read(&rt, args).await,
        Command::Walk(args) => ops::walk(&rt, args).await,
        Command::Set(args) => ops::set(&rt, args).await,
        Command::Invoke(args) => ops::invoke(&rt, args).await,
        Command::Audit(args) => audit::handle(&rt, args).await,
        Command::Onts(args) => onts::handle(&rt, args).await,
        Command::Plan(args) => inventory::plan(&rt, &args),
        Command::Capabilities(args) => inventory::capabilities(&rt, &args),
        // Completions are handled before the runtime is built
        Command::Completions(_) => Ok(()),
    }
}
