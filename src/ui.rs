// UI layer: the action menu and the four request flows.
// Prompts go through the `Prompter` trait so the flows can be scripted;
// results are written to any `io::Write` (stdout in the binary).

use std::fmt::Display;
use std::io::{self, BufRead, IsTerminal, StdinLock, Write};
use std::str::FromStr;
use std::time::Duration;

use console::Term;
use dialoguer::{Input, Password, Select};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::api::{ApiClient, AuthResponse, Post, PostsResponse, User};
use crate::error::{ApiError, CliError};
use crate::session::Session;

/// Printed when a typed action is not one of the menu entries.
pub const USAGE: &str = "Invalid action. Supported actions: register, login, post, get_posts, exit";

/// Printed after each listed post.
pub const SEPARATOR: &str = "-------------";

/// Top-level menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Register,
    Login,
    Post,
    GetPosts,
    Exit,
}

impl Action {
    /// Menu order.
    pub const ALL: [Action; 5] = [
        Action::Register,
        Action::Login,
        Action::Post,
        Action::GetPosts,
        Action::Exit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Action::Register => "register",
            Action::Login => "login",
            Action::Post => "post",
            Action::GetPosts => "get_posts",
            Action::Exit => "exit",
        }
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Action::ALL
            .into_iter()
            .find(|action| action.name() == wanted)
            .ok_or_else(|| s.to_string())
    }
}

/// Source of user input for the client loop.
pub trait Prompter {
    /// The raw action chosen or typed by the user.
    fn action(&mut self) -> Result<String, CliError>;
    /// A free-text answer; empty input is accepted.
    fn text(&mut self, label: &str) -> Result<String, CliError>;
    /// Like `text` but without echoing the input.
    fn secret(&mut self, label: &str) -> Result<String, CliError>;
}

/// Reads one answer per line, for input that does not come from a
/// terminal. End of input is a prompt failure.
pub struct LinePrompter<R> {
    reader: R,
}

impl<R: BufRead> LinePrompter<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    fn read_answer(&mut self) -> Result<String, CliError> {
        let mut line = String::new();
        let read = self.reader.read_line(&mut line).map_err(CliError::Prompt)?;
        if read == 0 {
            return Err(CliError::Prompt(io::ErrorKind::UnexpectedEof.into()));
        }
        let answer = line.strip_suffix('\n').unwrap_or(&line);
        Ok(answer.strip_suffix('\r').unwrap_or(answer).to_string())
    }
}

impl<R: BufRead> Prompter for LinePrompter<R> {
    fn action(&mut self) -> Result<String, CliError> {
        self.read_answer()
    }

    fn text(&mut self, _label: &str) -> Result<String, CliError> {
        self.read_answer()
    }

    fn secret(&mut self, _label: &str) -> Result<String, CliError> {
        self.read_answer()
    }
}

/// `dialoguer`-backed prompts. With `plain` set the action is typed
/// instead of picked from an arrow-key menu. Without a terminal on both
/// stdin and stderr, answers are read from stdin line by line instead.
pub struct TerminalPrompter {
    plain: bool,
    lines: Option<LinePrompter<StdinLock<'static>>>,
}

impl TerminalPrompter {
    pub fn new(plain: bool) -> Self {
        let attended = io::stdin().is_terminal() && Term::stderr().is_term();
        if !attended {
            debug!("no terminal attached, reading answers from stdin");
        }
        Self {
            plain,
            lines: (!attended).then(|| LinePrompter::new(io::stdin().lock())),
        }
    }
}

impl Prompter for TerminalPrompter {
    fn action(&mut self) -> Result<String, CliError> {
        if let Some(lines) = &mut self.lines {
            return lines.action();
        }
        if self.plain {
            return Input::<String>::new()
                .with_prompt("Select Action")
                .allow_empty(true)
                .interact_text()
                .map_err(CliError::Prompt);
        }
        let names = Action::ALL.map(Action::name);
        let selection = Select::new()
            .with_prompt("Select Action")
            .items(&names)
            .default(0)
            .interact()
            .map_err(CliError::Prompt)?;
        Ok(names[selection].to_string())
    }

    fn text(&mut self, label: &str) -> Result<String, CliError> {
        if let Some(lines) = &mut self.lines {
            return lines.text(label);
        }
        Input::<String>::new()
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()
            .map_err(CliError::Prompt)
    }

    fn secret(&mut self, label: &str) -> Result<String, CliError> {
        if let Some(lines) = &mut self.lines {
            return lines.secret(label);
        }
        Password::new()
            .with_prompt(label)
            .allow_empty_password(true)
            .interact()
            .map_err(CliError::Prompt)
    }
}

/// Whether the loop keeps prompting after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Main interactive loop. Runs until the user picks `exit` (`Ok`) or a
/// fatal error occurs (missing token, prompt failure).
pub fn main_menu<P, W>(
    api: &ApiClient,
    session: &mut Session,
    prompter: &mut P,
    out: &mut W,
) -> Result<(), CliError>
where
    P: Prompter,
    W: Write,
{
    loop {
        let choice = prompter.action()?;
        let flow = match choice.parse::<Action>() {
            Ok(action) => run_action(action, api, session, prompter, out)?,
            Err(unknown) => {
                debug!(input = %unknown, "unrecognized action");
                say(out, USAGE)?;
                Flow::Continue
            }
        };
        if flow == Flow::Exit {
            return Ok(());
        }
    }
}

/// Run one action. Request failures are printed and swallowed; only
/// fatal errors are returned. `Exit` prints the farewell and ends the loop.
pub fn run_action<P, W>(
    action: Action,
    api: &ApiClient,
    session: &mut Session,
    prompter: &mut P,
    out: &mut W,
) -> Result<Flow, CliError>
where
    P: Prompter,
    W: Write,
{
    debug!(action = action.name(), "dispatching");
    match action {
        Action::Register => handle_register(api, session, prompter, out)?,
        Action::Login => handle_login(api, session, prompter, out)?,
        Action::Post => {
            let token = session.token().ok_or(CliError::NotLoggedIn)?;
            handle_post(api, token, prompter, out)?;
        }
        Action::GetPosts => {
            let token = session.token().ok_or(CliError::NotLoggedIn)?;
            handle_get_posts(api, token, out)?;
        }
        Action::Exit => {
            say(out, "Exiting...")?;
            return Ok(Flow::Exit);
        }
    }
    Ok(Flow::Continue)
}

fn handle_register<P: Prompter, W: Write>(
    api: &ApiClient,
    session: &mut Session,
    prompter: &mut P,
    out: &mut W,
) -> Result<(), CliError> {
    let user = User {
        name: prompter.text("Enter your name")?,
        email: prompter.text("Enter your email")?,
        password: prompter.secret("Enter your password")?,
    };
    let outcome = with_spinner("Registering...", || api.register(&user));
    finish_auth(outcome, session, out, "Registration successful!")
}

fn handle_login<P: Prompter, W: Write>(
    api: &ApiClient,
    session: &mut Session,
    prompter: &mut P,
    out: &mut W,
) -> Result<(), CliError> {
    let email = prompter.text("Enter email address")?;
    let password = prompter.secret("Enter password")?;
    debug!(%email, "logging in");

    let user = User {
        email,
        password,
        ..User::default()
    };
    let outcome = with_spinner("Logging in...", || api.login(&user));
    finish_auth(outcome, session, out, "Login successful!")
}

/// Shared tail of register and login: store the token if one came back.
fn finish_auth<W: Write>(
    outcome: Result<AuthResponse, ApiError>,
    session: &mut Session,
    out: &mut W,
    success: &str,
) -> Result<(), CliError> {
    let resp = match outcome {
        Ok(resp) => resp,
        Err(err) => return report(out, &err),
    };
    match resp.token {
        Some(token) => {
            session.set_token(token);
            info!("session token updated");
        }
        None => say(out, "Token not present in response")?,
    }
    say(out, success)
}

fn handle_post<P: Prompter, W: Write>(
    api: &ApiClient,
    token: &str,
    prompter: &mut P,
    out: &mut W,
) -> Result<(), CliError> {
    let post = Post {
        content: prompter.text("Enter your post content")?,
        ..Post::default()
    };
    match with_spinner("Posting...", || api.create_post(token, &post)) {
        Ok(()) => say(out, "Post creation successful!"),
        Err(err) => report(out, &err),
    }
}

fn handle_get_posts<W: Write>(api: &ApiClient, token: &str, out: &mut W) -> Result<(), CliError> {
    match with_spinner("Fetching posts...", || api.list_posts(token)) {
        Ok(resp) => render_posts(out, &resp),
        Err(err) => report(out, &err),
    }
}

/// Print the `Posts:` header followed by one `[author] : content` line and
/// a separator per post.
pub fn render_posts<W: Write>(out: &mut W, resp: &PostsResponse) -> Result<(), CliError> {
    say(out, "Posts:")?;
    for post in &resp.posts {
        say(out, format_args!("[{}] : {}", post.author_name, post.content))?;
        say(out, SEPARATOR)?;
    }
    Ok(())
}

fn report<W: Write>(out: &mut W, err: &ApiError) -> Result<(), CliError> {
    debug!(error = %err, status = ?err.status_code(), "action failed");
    say(out, err)
}

fn say<W: Write>(out: &mut W, line: impl Display) -> Result<(), CliError> {
    writeln!(out, "{line}").map_err(CliError::Output)
}

/// Show a spinner on stderr while `f` runs. Nothing is drawn when stderr
/// is not a terminal.
fn with_spinner<T>(message: &'static str, f: impl FnOnce() -> T) -> T {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = f();
    spinner.finish_and_clear();
    result
}
