//! The weather job administration commands.
use crate::cli::{self, err};
use clap::{Arg, ArgAction, ArgMatches, Command};
use weather_job_lib::admin_prelude::WeatherAdmin;

#[derive(Debug)]
pub struct Admin;
impl Admin {
    /// The admin command name.
    pub const NAME: &'static str = "admin";
    /// Create the admin command.
    pub fn get() -> Command {
        Command::new(Self::NAME)
            .about("Administer the observations store.")
            .subcommand_required(true)
            .subcommand(init::command())
            .subcommand(drop::command())
            .subcommand(show::command())
    }
    /// Run the associated admin command.
    ///
    /// # Arguments
    ///
    /// - `weather_admin` is the administration API that will be used.
    /// - `args` holds the associated command arguments.
    pub fn run(weather_admin: &WeatherAdmin, mut args: ArgMatches) -> cli::Result<()> {
        match args.remove_subcommand() {
            Some((name, subcommand_args)) => match name.as_str() {
                init::COMMAND_NAME => init::execute(weather_admin, subcommand_args),
                drop::COMMAND_NAME => drop::execute(weather_admin, subcommand_args),
                show::COMMAND_NAME => show::execute(weather_admin, subcommand_args),
                _ => unreachable!("Admin command should not be here..."),
            },
            None => err!("An admin command was not found."),
        }
    }
}

mod init {
    //! The initialize database command.
    use super::*;

    /// The init command name.
    pub(super) const COMMAND_NAME: &'static str = "init";

    /// The drop schema first argument id.
    const DROP: &'static str = "DROP";

    /// Create the init command.
    ///
    pub(super) fn command() -> Command {
        Command::new(COMMAND_NAME).about("Initialize the observations database schema.").arg(
            Arg::new(DROP)
                .long("drop")
                .action(ArgAction::SetTrue)
                .help("Delete the existing schema before initializing."),
        )
    }

    /// Executes the init command.
    ///
    /// # Arguments
    ///
    /// * `weather_admin` is the administration API used by the command.
    /// * `args` contains the init command arguments.
    ///
    pub(super) fn execute(weather_admin: &WeatherAdmin, args: ArgMatches) -> cli::Result<()> {
        weather_admin.init(args.get_flag(DROP))?;
        println!("The observations database schema is ready.");
        Ok(())
    }
}

mod drop {
    //! The drop database command.
    use super::*;

    /// The drop command name.
    pub(super) const COMMAND_NAME: &'static str = "drop";

    /// The remove database file argument id.
    const DELETE: &'static str = "DELETE";

    /// Create the drop command.
    ///
    pub(super) fn command() -> Command {
        Command::new(COMMAND_NAME).about("Delete the observations database schema.").arg(
            Arg::new(DELETE)
                .long("delete")
                .action(ArgAction::SetTrue)
                .help("Remove the database file instead of just the schema."),
        )
    }

    /// Executes the drop command.
    ///
    /// # Arguments
    ///
    /// * `weather_admin` is the administration API used by the command.
    /// * `args` contains the drop command arguments.
    ///
    pub(super) fn execute(weather_admin: &WeatherAdmin, args: ArgMatches) -> cli::Result<()> {
        weather_admin.drop(args.get_flag(DELETE))?;
        println!("The observations database schema was dropped.");
        Ok(())
    }
}

mod show {
    //! The show database details command.
    use super::*;
    use toolslib::fmt::commafy;

    /// The show command name.
    pub(super) const COMMAND_NAME: &'static str = "show";

    /// Create the show command.
    ///
    pub(super) fn command() -> Command {
        Command::new(COMMAND_NAME).about("Show information about the observations database.")
    }

    /// Executes the show command.
    ///
    /// # Arguments
    ///
    /// * `weather_admin` is the administration API used by the command.
    /// * `args` contains the show command arguments.
    ///
    pub(super) fn execute(weather_admin: &WeatherAdmin, _args: ArgMatches) -> cli::Result<()> {
        match weather_admin.details()? {
            None => println!("The observations database does not exist."),
            Some(details) => {
                println!("Database size: {} bytes", commafy(details.size));
                println!("{:<20}{:>10}", "Location", "Hours");
                for location_details in details.location_details {
                    println!("{:<20}{:>10}", location_details.location, commafy(location_details.hours));
                }
            }
        }
        Ok(())
    }
}
