use std::process;

use clap::Parser;

extern crate pretty_env_logger;
#[macro_use]
extern crate log;

mod arithmetic;
mod console;
mod errors;
mod file_store;
mod menu;

use console::{ConsoleIo, TerminalConsole};
use file_store::DiskFileStore;
use menu::{Launch, MenuController};

/// Calculator that keeps a timestamped log of every operation.
///
/// Every positional value belongs to the calculator, so `-h` is a directory name.
#[derive(Parser, Debug)]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// Nothing, a log directory, or: directory operand1 operator operand2
    #[arg(num_args = 0.., allow_hyphen_values = true, trailing_var_arg = true)]
    args: Vec<String>,
}

fn main() {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let mut menu = MenuController::new(TerminalConsole::stdio(), DiskFileStore);
    if let Err(err) = menu.run(Launch::from_args(cli.args)) {
        error!("Fatal: {}", err);
        let (mut console, _) = menu.into_parts();
        if let Err(report_err) = console.show_error(&err.to_string()) {
            error!("Could not report the failure: {}", report_err);
        }
        process::exit(1);
    }
}
