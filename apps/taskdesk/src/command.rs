//! Console command grammar.

use chrono::NaiveDate;

use taskdesk_core::domain::{NewTask, Registration, SortKey, TaskPatch, TaskPriority, TaskStatus};

pub const HELP: &str = "\
Account
  login <email> <password>
  register <name...> <email> <password> <confirm>
  logout
  whoami

Tasks
  list                                     reload the current page
  search <text...>                         filter by text (empty clears)
  status <all|pending|completed>
  sort <newest|oldest|priority|due>
  page <n> | next | prev
  add [priority=LOW|MEDIUM|HIGH] [due=YYYY-MM-DD] <title...>
  edit <id> [title=...] [priority=...] [due=YYYY-MM-DD|none] [description=...|none]
  toggle <id>
  delete <id>
  stats

  help | quit";

const EDIT_FIELDS: [&str; 4] = ["title", "priority", "due", "description"];

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login { email: String, password: String },
    Register(Registration),
    Logout,
    Whoami,
    List,
    Search(String),
    Status(Option<TaskStatus>),
    Sort(SortKey),
    Page(u32),
    Next,
    Prev,
    Add(NewTask),
    Edit { id: String, patch: TaskPatch },
    Toggle(String),
    Delete(String),
    Stats,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Unknown command '{0}', type 'help' for the list")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("{0}")]
    Invalid(String),
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match name.to_ascii_lowercase().as_str() {
        "login" => match args.as_slice() {
            [email, password] => Command::Login {
                email: email.to_string(),
                password: password.to_string(),
            },
            _ => return Err(ParseError::Usage("login <email> <password>")),
        },
        "register" => match args.as_slice() {
            [name @ .., email, password, confirm] if !name.is_empty() => {
                Command::Register(Registration {
                    name: name.join(" "),
                    email: email.to_string(),
                    password: password.to_string(),
                    confirm_password: confirm.to_string(),
                })
            }
            _ => {
                return Err(ParseError::Usage(
                    "register <name...> <email> <password> <confirm>",
                ));
            }
        },
        "logout" => Command::Logout,
        "whoami" => Command::Whoami,
        "list" | "ls" => Command::List,
        "search" => Command::Search(args.join(" ")),
        "status" => match args.as_slice() {
            ["all"] => Command::Status(None),
            [status] => Command::Status(Some(status.parse().map_err(ParseError::Invalid)?)),
            _ => return Err(ParseError::Usage("status <all|pending|completed>")),
        },
        "sort" => match args.as_slice() {
            [sort] => Command::Sort(sort.parse().map_err(ParseError::Invalid)?),
            _ => return Err(ParseError::Usage("sort <newest|oldest|priority|due>")),
        },
        "page" => match args.as_slice() {
            [page] => Command::Page(
                page.parse()
                    .map_err(|_| ParseError::Invalid(format!("not a page number: {page}")))?,
            ),
            _ => return Err(ParseError::Usage("page <n>")),
        },
        "next" => Command::Next,
        "prev" => Command::Prev,
        "add" => Command::Add(parse_new_task(&args)?),
        "edit" => match args.split_first() {
            Some((id, rest)) if !rest.is_empty() => Command::Edit {
                id: id.to_string(),
                patch: parse_patch(rest)?,
            },
            _ => {
                return Err(ParseError::Usage(
                    "edit <id> [title=...] [priority=...] [due=...] [description=...]",
                ));
            }
        },
        "toggle" => Command::Toggle(single_id(&args, "toggle <id>")?),
        "delete" | "rm" => Command::Delete(single_id(&args, "delete <id>")?),
        "stats" => Command::Stats,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn single_id(args: &[&str], usage: &'static str) -> Result<String, ParseError> {
    match args {
        [id] => Ok(id.to_string()),
        _ => Err(ParseError::Usage(usage)),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ParseError::Invalid(format!("not a date (YYYY-MM-DD): {raw}")))
}

fn parse_priority(raw: &str) -> Result<TaskPriority, ParseError> {
    raw.parse().map_err(ParseError::Invalid)
}

/// `priority=` and `due=` are single words anywhere on the line; every other
/// word belongs to the title.
fn parse_new_task(args: &[&str]) -> Result<NewTask, ParseError> {
    let mut title = Vec::new();
    let mut task = NewTask::default();

    for word in args {
        if let Some(priority) = word.strip_prefix("priority=") {
            task.priority = Some(parse_priority(priority)?);
        } else if let Some(due) = word.strip_prefix("due=") {
            task.due_date = Some(parse_date(due)?);
        } else {
            title.push(*word);
        }
    }

    task.title = title.join(" ");
    Ok(task)
}

/// Splits `key=value words...` runs; a value extends to the next known key.
fn parse_patch(args: &[&str]) -> Result<TaskPatch, ParseError> {
    let mut fields: Vec<(&str, Vec<&str>)> = Vec::new();

    for word in args {
        let field = word
            .split_once('=')
            .filter(|(key, _)| EDIT_FIELDS.contains(key));

        if let Some((key, value)) = field {
            fields.push((key, vec![value]));
            continue;
        }

        match fields.last_mut() {
            Some((_, values)) => values.push(*word),
            None => {
                return Err(ParseError::Invalid(format!(
                    "expected one of title=, priority=, due=, description= but got '{word}'"
                )));
            }
        }
    }

    let mut patch = TaskPatch::default();
    for (key, values) in fields {
        let value = values.join(" ");
        let value = value.trim();
        let cleared = value.is_empty() || value.eq_ignore_ascii_case("none");

        match key {
            "title" => patch.title = Some(value.to_string()),
            "priority" => patch.priority = Some(parse_priority(value)?),
            "due" if cleared => patch.due_date = Some(None),
            "due" => patch.due_date = Some(Some(parse_date(value)?)),
            "description" if cleared => patch.description = Some(None),
            _ => patch.description = Some(Some(value.to_string())),
        }
    }
    Ok(patch)
}
