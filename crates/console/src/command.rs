use std::str::FromStr;

use thiserror::Error;

/// A line of input from the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Dismiss the sign-in modal.
    CloseAuth,
    /// Dismiss the payment modal.
    ClosePayment,
    /// Click the card of an event.
    Click(usize),
    /// Sign in from the open sign-in modal.
    Connect,
    /// Show an event's detail page.
    Detail(String),
    /// List the events with their register buttons.
    Events,
    /// Print the command list.
    Help,
    /// List the signed-in user's events.
    Mine,
    /// Confirm payment for the pending event.
    Pay,
    /// Leave.
    Quit,
    /// Press an event's register button.
    Register(usize),
    /// Open the sign-in modal from the header.
    SignIn,
    /// Sign out.
    SignOut,
    /// Show the signed-in user.
    WhoAmI,
}

/// Input that is not a command.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseCommandError {
    /// The command needs an argument.
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    /// An event index was not a number.
    #[error("not an event number: {0}")]
    InvalidIndex(String),

    /// Unknown command.
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),
}

/// Command summary printed by `help`.
pub const HELP: &str = "\
events            list events
register N        press the register button of event N
click N           click the card of event N
sign-in           open the sign-in modal
connect           sign in from the open modal
close-auth        dismiss the sign-in modal
pay               confirm payment for the pending event
close-payment     dismiss the payment modal
detail ID         show an event
mine              list your events
whoami            show the signed-in user
sign-out          sign out
quit              leave";

fn index(command: &'static str, argument: Option<&str>) -> Result<usize, ParseCommandError> {
    let argument = argument.ok_or(ParseCommandError::MissingArgument(command))?;

    argument
        .parse()
        .map_err(|_| ParseCommandError::InvalidIndex(argument.to_string()))
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default();
        let argument = words.next();

        Ok(match name {
            "click" => Self::Click(index("click", argument)?),
            "close-auth" => Self::CloseAuth,
            "close-payment" => Self::ClosePayment,
            "connect" => Self::Connect,
            "detail" => Self::Detail(
                argument
                    .ok_or(ParseCommandError::MissingArgument("detail"))?
                    .to_string(),
            ),
            "events" | "ls" => Self::Events,
            "help" | "?" => Self::Help,
            "mine" => Self::Mine,
            "pay" => Self::Pay,
            "quit" | "exit" => Self::Quit,
            "register" => Self::Register(index("register", argument)?),
            "sign-in" => Self::SignIn,
            "sign-out" => Self::SignOut,
            "whoami" => Self::WhoAmI,
            other => return Err(ParseCommandError::Unknown(other.to_string())),
        })
    }
}
