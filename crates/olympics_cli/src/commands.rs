//! Line-oriented command interpreter.
//!
//! # Responsibility
//! - Tokenize one input line and dispatch it to the controller.
//! - Turn result polarity into user feedback ("already exists", "not found").
//!
//! # Invariants
//! - A failed command never ends the loop; its message is printed instead.
//! - Entity arguments are read in schema field order.

use log::{debug, warn};
use olympics_core::model::{FieldValue, Record};
use olympics_core::validation::require_present;
use olympics_core::{
    Athlete, Competition, Controller, ControllerError, CrudService, Entity, EntityId,
    MissingValueError, ParseError, Participation, RepoError, ReportKind, Sponsor, Sponsorship,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};

const PROMPT: &str = "olympics> ";

pub const HELP: &str = "\
Commands:
  athlete add|update <id> <firstName> <lastName> <country> <age>
  competition add|update <id> <dd-MM-yyyy> <location> <name> <description>
  participation add|update <id> <athleteId> <competitionId> <rank>
  sponsor add|update <id> <name> <country>
  sponsorship add|update <id> <competitionId> <sponsorId> <moneyContribution>
  <entity> delete <id> | get <id> | list
  athlete filter first-name|country <value>
  competition filter location <value>
  participation filter rank|competition <value>
  sponsor filter country <value>
  sponsorship filter min-contribution|sponsor <value>
  report sponsor-contributions|competition-sponsorships|athlete-participations|competition-participations|all
  help
  exit
Quote arguments containing spaces: \"Stade de France\".";

/// Result of one successfully interpreted line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue(String),
    Exit,
}

#[derive(Debug)]
pub enum CommandError {
    Usage(String),
    MissingValue(MissingValueError),
    InvalidValue { what: &'static str, raw: String },
    Parse(ParseError),
    Controller(ControllerError),
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usage(message) => write!(f, "{message}"),
            Self::MissingValue(err) => write!(f, "{err}"),
            Self::InvalidValue { what, raw } => write!(f, "`{raw}` is not a valid {what}"),
            Self::Parse(err) => write!(f, "{err}"),
            Self::Controller(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CommandError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Usage(_) | Self::InvalidValue { .. } => None,
            Self::MissingValue(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Controller(err) => Some(err),
        }
    }
}

impl From<MissingValueError> for CommandError {
    fn from(value: MissingValueError) -> Self {
        Self::MissingValue(value)
    }
}

impl From<ParseError> for CommandError {
    fn from(value: ParseError) -> Self {
        Self::Parse(value)
    }
}

impl From<ControllerError> for CommandError {
    fn from(value: ControllerError) -> Self {
        Self::Controller(value)
    }
}

impl From<RepoError> for CommandError {
    fn from(value: RepoError) -> Self {
        Self::Controller(ControllerError::Repo(value))
    }
}

type CommandResult = Result<String, CommandError>;

/// Reads commands until `exit` or end of input.
pub fn run_loop(
    controller: &mut Controller,
    input: impl BufRead,
    mut output: impl Write,
) -> io::Result<()> {
    write!(output, "{PROMPT}")?;
    output.flush()?;
    for line in input.lines() {
        let line = line?;
        match execute(controller, &line) {
            Ok(Outcome::Exit) => break,
            Ok(Outcome::Continue(text)) => {
                if !text.is_empty() {
                    writeln!(output, "{text}")?;
                }
            }
            Err(err) => {
                warn!("event=command module=cli status=error error={err}");
                writeln!(output, "error: {err}")?;
            }
        }
        write!(output, "{PROMPT}")?;
        output.flush()?;
    }
    writeln!(output)?;
    Ok(())
}

/// Interprets one input line.
pub fn execute(controller: &mut Controller, line: &str) -> Result<Outcome, CommandError> {
    let tokens = tokenize(line)?;
    let Some((head, rest)) = tokens.split_first() else {
        return Ok(Outcome::Continue(String::new()));
    };
    debug!("event=command module=cli status=start command={head}");

    match head.as_str() {
        "help" => Ok(Outcome::Continue(HELP.to_string())),
        "exit" | "quit" => Ok(Outcome::Exit),
        "report" => report(controller, rest).map(Outcome::Continue),
        "athlete" => athlete(controller, rest).map(Outcome::Continue),
        "competition" => competition(controller, rest).map(Outcome::Continue),
        "participation" => participation(controller, rest).map(Outcome::Continue),
        "sponsor" => sponsor(controller, rest).map(Outcome::Continue),
        "sponsorship" => sponsorship(controller, rest).map(Outcome::Continue),
        other => Err(CommandError::Usage(format!(
            "unknown command `{other}`; type `help`"
        ))),
    }
}

fn athlete(controller: &mut Controller, args: &[String]) -> CommandResult {
    let (action, args) = split_action(args)?;
    match action {
        "add" => added(controller.athletes_mut().add(parse_entity::<Athlete>(args)?)?),
        "update" => {
            let athlete = parse_entity::<Athlete>(args)?;
            let id = athlete.id;
            updated::<Athlete>(controller.athletes_mut().update(athlete)?, id)
        }
        "delete" => {
            let id = parse_id(args)?;
            deleted::<Athlete>(controller.delete_athlete(id)?, id)
        }
        "get" => get(controller.athletes(), args),
        "list" => list(controller.athletes(), args),
        "filter" => {
            let (criterion, value) = filter_args(args)?;
            match criterion {
                "first-name" => Ok(render(controller.athletes().filter_by_first_name(value))),
                "country" => Ok(render(controller.athletes().filter_by_country(value))),
                other => Err(unknown_filter("athlete", other)),
            }
        }
        other => Err(unknown_action("athlete", other)),
    }
}

fn competition(controller: &mut Controller, args: &[String]) -> CommandResult {
    let (action, args) = split_action(args)?;
    match action {
        "add" => added(
            controller
                .competitions_mut()
                .add(parse_entity::<Competition>(args)?)?,
        ),
        "update" => {
            let competition = parse_entity::<Competition>(args)?;
            let id = competition.id;
            updated::<Competition>(controller.competitions_mut().update(competition)?, id)
        }
        "delete" => {
            let id = parse_id(args)?;
            deleted::<Competition>(controller.delete_competition(id)?, id)
        }
        "get" => get(controller.competitions(), args),
        "list" => list(controller.competitions(), args),
        "filter" => {
            let (criterion, value) = filter_args(args)?;
            match criterion {
                "location" => Ok(render(controller.competitions().filter_by_location(value))),
                other => Err(unknown_filter("competition", other)),
            }
        }
        other => Err(unknown_action("competition", other)),
    }
}

fn participation(controller: &mut Controller, args: &[String]) -> CommandResult {
    let (action, args) = split_action(args)?;
    match action {
        "add" => added(controller.add_participation(parse_entity::<Participation>(args)?)?),
        "update" => {
            let participation = parse_entity::<Participation>(args)?;
            let id = participation.id;
            updated::<Participation>(controller.update_participation(participation)?, id)
        }
        "delete" => {
            let id = parse_id(args)?;
            deleted::<Participation>(controller.delete_participation(id)?, id)
        }
        "get" => get(controller.participations(), args),
        "list" => list(controller.participations(), args),
        "filter" => {
            let (criterion, value) = filter_args(args)?;
            let participations = controller.participations();
            match criterion {
                "rank" => Ok(render(participations.filter_by_rank(parse_int(value, "rank")?))),
                "competition" => Ok(render(
                    participations.filter_by_competition_id(parse_id_value(value)?),
                )),
                other => Err(unknown_filter("participation", other)),
            }
        }
        other => Err(unknown_action("participation", other)),
    }
}

fn sponsor(controller: &mut Controller, args: &[String]) -> CommandResult {
    let (action, args) = split_action(args)?;
    match action {
        "add" => added(controller.sponsors_mut().add(parse_entity::<Sponsor>(args)?)?),
        "update" => {
            let sponsor = parse_entity::<Sponsor>(args)?;
            let id = sponsor.id;
            updated::<Sponsor>(controller.sponsors_mut().update(sponsor)?, id)
        }
        "delete" => {
            let id = parse_id(args)?;
            deleted::<Sponsor>(controller.delete_sponsor(id)?, id)
        }
        "get" => get(controller.sponsors(), args),
        "list" => list(controller.sponsors(), args),
        "filter" => {
            let (criterion, value) = filter_args(args)?;
            match criterion {
                "country" => Ok(render(controller.sponsors().filter_by_country(value))),
                other => Err(unknown_filter("sponsor", other)),
            }
        }
        other => Err(unknown_action("sponsor", other)),
    }
}

fn sponsorship(controller: &mut Controller, args: &[String]) -> CommandResult {
    let (action, args) = split_action(args)?;
    match action {
        "add" => added(controller.add_sponsorship(parse_entity::<Sponsorship>(args)?)?),
        "update" => {
            let sponsorship = parse_entity::<Sponsorship>(args)?;
            let id = sponsorship.id;
            updated::<Sponsorship>(controller.update_sponsorship(sponsorship)?, id)
        }
        "delete" => {
            let id = parse_id(args)?;
            deleted::<Sponsorship>(controller.delete_sponsorship(id)?, id)
        }
        "get" => get(controller.sponsorships(), args),
        "list" => list(controller.sponsorships(), args),
        "filter" => {
            let (criterion, value) = filter_args(args)?;
            let sponsorships = controller.sponsorships();
            match criterion {
                "min-contribution" => Ok(render(
                    sponsorships.filter_by_min_contribution(parse_int(value, "amount")?),
                )),
                "sponsor" => Ok(render(
                    sponsorships.filter_by_sponsor_id(parse_id_value(value)?),
                )),
                other => Err(unknown_filter("sponsorship", other)),
            }
        }
        other => Err(unknown_action("sponsorship", other)),
    }
}

fn report(controller: &Controller, args: &[String]) -> CommandResult {
    let name = require_present(args.first(), "report name")?;
    expect_arity(args, 1)?;
    let reports = controller.reports();
    if name == "all" {
        let sections: Vec<String> = ReportKind::ALL
            .into_iter()
            .map(|kind| format!("[{}]\n{}", kind.name(), reports.render(kind)))
            .collect();
        return Ok(sections.join("\n"));
    }
    let kind = ReportKind::from_name(name)
        .ok_or_else(|| CommandError::Usage(format!("unknown report `{name}`; type `help`")))?;
    Ok(reports.render(kind))
}

/// Builds an entity from positional arguments in schema order.
fn parse_entity<T: Entity>(args: &[String]) -> Result<T, CommandError> {
    let schema = T::schema();
    let mut values = Vec::with_capacity(schema.field_count());
    for (index, field) in schema.fields.iter().enumerate() {
        let raw = require_present(args.get(index), field.name)?;
        let value = FieldValue::parse(field.kind, raw).ok_or_else(|| CommandError::InvalidValue {
            what: field.kind.describe(),
            raw: raw.clone(),
        })?;
        values.push(value);
    }
    expect_arity(args, schema.field_count())?;
    Ok(T::from_record(Record::new(values))?)
}

fn parse_id(args: &[String]) -> Result<EntityId, CommandError> {
    let raw = require_present(args.first(), "id")?;
    expect_arity(args, 1)?;
    parse_id_value(raw)
}

fn parse_id_value(raw: &str) -> Result<EntityId, CommandError> {
    raw.parse().map_err(|_| CommandError::InvalidValue {
        what: "id",
        raw: raw.to_string(),
    })
}

fn parse_int(raw: &str, what: &'static str) -> Result<i32, CommandError> {
    raw.parse().map_err(|_| CommandError::InvalidValue {
        what,
        raw: raw.to_string(),
    })
}

fn split_action(args: &[String]) -> Result<(&str, &[String]), CommandError> {
    let (action, rest) = args
        .split_first()
        .ok_or_else(|| CommandError::Usage("missing action; type `help`".to_string()))?;
    Ok((action.as_str(), rest))
}

fn filter_args(args: &[String]) -> Result<(&str, &str), CommandError> {
    let criterion = require_present(args.first(), "filter criterion")?;
    let value = require_present(args.get(1), "filter value")?;
    expect_arity(args, 2)?;
    Ok((criterion.as_str(), value.as_str()))
}

fn expect_arity(args: &[String], expected: usize) -> Result<(), CommandError> {
    if args.len() > expected {
        return Err(CommandError::Usage(format!(
            "expected {expected} argument(s), got {}",
            args.len()
        )));
    }
    Ok(())
}

fn unknown_action(entity: &str, action: &str) -> CommandError {
    CommandError::Usage(format!("unknown {entity} action `{action}`; type `help`"))
}

fn unknown_filter(entity: &str, criterion: &str) -> CommandError {
    CommandError::Usage(format!("unknown {entity} filter `{criterion}`; type `help`"))
}

fn added<T: Entity>(existing: Option<T>) -> CommandResult {
    Ok(match existing {
        None => format!("{} added.", T::schema().name),
        Some(existing) => format!(
            "{} with ID {} already exists; nothing was added.",
            T::schema().name,
            existing.id()
        ),
    })
}

fn updated<T: Entity>(previous: Option<T>, id: EntityId) -> CommandResult {
    Ok(match previous {
        Some(_) => format!("{} {id} updated.", T::schema().name),
        None => not_found::<T>(id),
    })
}

fn deleted<T: Entity>(removed: Option<T>, id: EntityId) -> CommandResult {
    Ok(match removed {
        Some(_) => format!("{} {id} deleted.", T::schema().name),
        None => not_found::<T>(id),
    })
}

fn not_found<T: Entity>(id: EntityId) -> String {
    format!("{} with ID {id} not found.", T::schema().name)
}

fn get<T: Entity + Display>(service: &CrudService<T>, args: &[String]) -> CommandResult {
    let id = parse_id(args)?;
    Ok(service
        .get(id)
        .map(|entity| entity.to_string())
        .unwrap_or_else(|| not_found::<T>(id)))
}

fn list<T: Entity + Display>(service: &CrudService<T>, args: &[String]) -> CommandResult {
    expect_arity(args, 0)?;
    Ok(render(service.list()))
}

fn render<T: Display>(entities: Vec<T>) -> String {
    if entities.is_empty() {
        return "(none)".to_string();
    }
    entities
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Splits on whitespace; double quotes group words into one argument.
fn tokenize(line: &str) -> Result<Vec<String>, CommandError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut pending = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                pending = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if pending {
                    tokens.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }
    if in_quotes {
        return Err(CommandError::Usage("unterminated quote".to_string()));
    }
    if pending {
        tokens.push(current);
    }
    Ok(tokens)
}
