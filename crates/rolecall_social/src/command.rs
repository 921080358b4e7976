//! Parsing the `roles` text command group.

use rolecall_core::RoleId;
use rolecall_error::{SelectorError, SelectorResult};

/// A parsed `roles` subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RolesCommand {
    /// Publish the selector in the current channel
    Spawn,
    /// Register a role
    Add {
        /// Role to offer
        role_id: RoleId,
        /// Trigger emoji
        emoji: String,
        /// Display name
        name: String,
        /// Description (rest of the line)
        description: String,
    },
    /// Remove a role
    Remove {
        /// Role to remove
        role_id: RoleId,
    },
    /// Edit one field of a role
    Edit {
        /// Role to edit
        role_id: RoleId,
        /// Field name, validated later
        field: String,
        /// New value (rest of the line)
        value: String,
    },
    /// Toggle inline fields
    Inline,
    /// Move a role up
    MoveUp {
        /// Role to move
        role_id: RoleId,
    },
    /// Move a role down
    MoveDown {
        /// Role to move
        role_id: RoleId,
    },
    /// Show configured entries
    Print,
    /// Show every guild role
    List,
    /// Show usage
    Help,
}

/// Subcommand names, matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
enum Subcommand {
    Spawn,
    Add,
    Remove,
    Edit,
    Inline,
    MoveUp,
    MoveDown,
    Print,
    #[strum(serialize = "list", serialize = "all")]
    List,
    Help,
}

/// Usage text for the command group.
pub const USAGE: &str = "\
roles spawn - post the role selector here
roles add <role> <emoji> <name> <description>
roles remove <role>
roles edit <role> <emoji|name|description> <value>
roles inline - toggle inline fields
roles moveup <role> / roles movedown <role>
roles print - show configured roles
roles list - show every role on this server";

/// Split a command line on whitespace, keeping double-quoted runs together.
///
/// ```
/// use rolecall_social::tokenize;
///
/// assert_eq!(
///     tokenize(r#"add 1 🔵 "Blue Team" likes blue"#),
///     vec!["add", "1", "🔵", "Blue Team", "likes", "blue"]
/// );
/// ```
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut started = false;

    for c in input.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                started = true;
            }
            c if c.is_whitespace() && !quoted => {
                if started {
                    tokens.push(std::mem::take(&mut current));
                    started = false;
                }
            }
            c => {
                current.push(c);
                started = true;
            }
        }
    }
    if started {
        tokens.push(current);
    }
    tokens
}

/// Parse a role mention (`<@&id>`) or a raw id.
pub fn parse_role(input: &str) -> SelectorResult<RoleId> {
    let digits = input
        .strip_prefix("<@&")
        .and_then(|rest| rest.strip_suffix('>'))
        .unwrap_or(input);
    digits
        .parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .map(RoleId)
        .ok_or_else(|| SelectorError::validation("role", "Input has to be a role or an integer."))
}

/// Parse a message as a `roles` command.
///
/// Returns `None` when the message is not addressed to the command group at all.
pub fn parse_command(prefix: &str, content: &str) -> Option<SelectorResult<RolesCommand>> {
    let rest = content.trim_start().strip_prefix(prefix)?;
    let tokens = tokenize(rest);
    let (group, args) = tokens.split_first()?;
    if !group.eq_ignore_ascii_case("roles") {
        return None;
    }
    Some(parse_subcommand(args))
}

fn parse_subcommand(args: &[String]) -> SelectorResult<RolesCommand> {
    let Some((name, args)) = args.split_first() else {
        return Ok(RolesCommand::Help);
    };
    let subcommand: Subcommand = name
        .parse()
        .map_err(|_| usage(&format!("Unknown subcommand '{name}'.")))?;

    let command = match subcommand {
        Subcommand::Spawn => RolesCommand::Spawn,
        Subcommand::Inline => RolesCommand::Inline,
        Subcommand::Print => RolesCommand::Print,
        Subcommand::List => RolesCommand::List,
        Subcommand::Help => RolesCommand::Help,
        Subcommand::Remove => RolesCommand::Remove {
            role_id: role_arg(args)?,
        },
        Subcommand::MoveUp => RolesCommand::MoveUp {
            role_id: role_arg(args)?,
        },
        Subcommand::MoveDown => RolesCommand::MoveDown {
            role_id: role_arg(args)?,
        },
        Subcommand::Add => match args {
            [role, emoji, name, description @ ..] if !description.is_empty() => {
                RolesCommand::Add {
                    role_id: parse_role(role)?,
                    emoji: emoji.clone(),
                    name: name.clone(),
                    description: description.join(" "),
                }
            }
            _ => return Err(usage("Missing arguments.")),
        },
        Subcommand::Edit => match args {
            [role, field, value @ ..] if !value.is_empty() => RolesCommand::Edit {
                role_id: parse_role(role)?,
                field: field.clone(),
                value: value.join(" "),
            },
            _ => return Err(usage("Missing arguments.")),
        },
    };
    Ok(command)
}

fn role_arg(args: &[String]) -> SelectorResult<RoleId> {
    match args.first() {
        Some(role) => parse_role(role),
        None => Err(usage("Missing role.")),
    }
}

fn usage(problem: &str) -> SelectorError {
    SelectorError::validation("arguments", format!("{problem}\n```\n{USAGE}\n```"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> SelectorResult<RolesCommand> {
        parse_command("!", content).expect("addressed to roles")
    }

    #[test]
    fn test_ignores_other_messages() {
        assert!(parse_command("!", "hello there").is_none());
        assert!(parse_command("!", "!ping").is_none());
        assert!(parse_command("!", "?roles spawn").is_none());
    }

    #[test]
    fn test_parses_simple_subcommands() {
        assert_eq!(parse("!roles spawn").unwrap(), RolesCommand::Spawn);
        assert_eq!(parse("!ROLES Inline").unwrap(), RolesCommand::Inline);
        assert_eq!(parse("!roles all").unwrap(), RolesCommand::List);
        assert_eq!(parse("!roles").unwrap(), RolesCommand::Help);
    }

    #[test]
    fn test_parses_add_with_quoted_name() {
        let command = parse(r#"!roles add <@&100> 🔵 "Blue Team" For people who like blue"#);
        assert_eq!(
            command.unwrap(),
            RolesCommand::Add {
                role_id: RoleId(100),
                emoji: "🔵".to_string(),
                name: "Blue Team".to_string(),
                description: "For people who like blue".to_string(),
            }
        );
    }

    #[test]
    fn test_parses_edit_and_moves() {
        assert_eq!(
            parse("!roles edit 100 description Now with more blue").unwrap(),
            RolesCommand::Edit {
                role_id: RoleId(100),
                field: "description".to_string(),
                value: "Now with more blue".to_string(),
            }
        );
        assert_eq!(
            parse("!roles moveup 100").unwrap(),
            RolesCommand::MoveUp {
                role_id: RoleId(100)
            }
        );
        assert_eq!(
            parse("!roles movedown <@&200>").unwrap(),
            RolesCommand::MoveDown {
                role_id: RoleId(200)
            }
        );
    }

    #[test]
    fn test_rejects_bad_roles_and_missing_arguments() {
        let err = parse("!roles remove blue").unwrap_err();
        assert_eq!(err.user_message(), "Input has to be a role or an integer.");

        assert!(parse("!roles add 100 🔵 Blue").is_err());
        assert!(parse("!roles remove").is_err());
        assert!(parse("!roles frobnicate").is_err());
    }

    #[test]
    fn test_tokenize_keeps_empty_quotes() {
        assert_eq!(tokenize(r#"a "" b"#), vec!["a", "", "b"]);
        assert!(tokenize("   ").is_empty());
    }
}
