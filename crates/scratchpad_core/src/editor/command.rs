//! Slash command catalogue and filtering.

use crate::model::block::BlockKind;
use crate::model::theme::Theme;

/// What a palette command does when committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandAction {
    ToggleTheme,
    Upload,
    Export,
    Text,
    Heading1,
    Heading2,
    Heading3,
    BulletList,
    NumberList,
    Todo,
    Quote,
    Divider,
}

impl CommandAction {
    /// Stable id; also matched by the filter.
    pub fn id(self) -> &'static str {
        match self {
            Self::ToggleTheme => "theme",
            Self::Upload => "upload",
            Self::Export => "export",
            Self::Text => "text",
            Self::Heading1 => "h1",
            Self::Heading2 => "h2",
            Self::Heading3 => "h3",
            Self::BulletList => "ul",
            Self::NumberList => "ol",
            Self::Todo => "todo",
            Self::Quote => "quote",
            Self::Divider => "divider",
        }
    }

    /// Target block kind for block-producing actions.
    pub fn block_kind(self) -> Option<BlockKind> {
        match self {
            Self::Text => Some(BlockKind::Text),
            Self::Heading1 => Some(BlockKind::Heading1),
            Self::Heading2 => Some(BlockKind::Heading2),
            Self::Heading3 => Some(BlockKind::Heading3),
            Self::BulletList => Some(BlockKind::BulletList),
            Self::NumberList => Some(BlockKind::NumberList),
            Self::Todo => Some(BlockKind::TodoItem),
            Self::Quote => Some(BlockKind::Quote),
            Self::Divider => Some(BlockKind::Divider),
            Self::ToggleTheme | Self::Upload | Self::Export => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandGroup {
    Theme,
    File,
    Blocks,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub icon: &'static str,
    pub label: &'static str,
    pub hint: &'static str,
    pub action: CommandAction,
    pub group: CommandGroup,
}

impl Command {
    const fn new(
        icon: &'static str,
        label: &'static str,
        hint: &'static str,
        action: CommandAction,
        group: CommandGroup,
    ) -> Self {
        Self {
            icon,
            label,
            hint,
            action,
            group,
        }
    }

    fn matches(&self, needle: &str) -> bool {
        self.label.to_lowercase().contains(needle)
            || self.hint.to_lowercase().contains(needle)
            || self.action.id().contains(needle)
    }
}

const BLOCK_COMMANDS: &[Command] = &[
    Command::new("T", "Text", "", CommandAction::Text, CommandGroup::Blocks),
    Command::new("H1", "Heading 1", "#", CommandAction::Heading1, CommandGroup::Blocks),
    Command::new("H2", "Heading 2", "##", CommandAction::Heading2, CommandGroup::Blocks),
    Command::new("H3", "Heading 3", "###", CommandAction::Heading3, CommandGroup::Blocks),
    Command::new("•", "Bulleted list", "-", CommandAction::BulletList, CommandGroup::Blocks),
    Command::new("1.", "Numbered list", "1.", CommandAction::NumberList, CommandGroup::Blocks),
    Command::new("☐", "To-do list", "[]", CommandAction::Todo, CommandGroup::Blocks),
    Command::new("❝", "Quote", "", CommandAction::Quote, CommandGroup::Blocks),
    Command::new("—", "Divider", "---", CommandAction::Divider, CommandGroup::Blocks),
];

/// Full command list in declared order; the theme entry reflects `theme`.
pub fn default_commands(theme: Theme) -> Vec<Command> {
    let theme_command = match theme {
        Theme::Dark => Command::new(
            "☀",
            "Light mode",
            "",
            CommandAction::ToggleTheme,
            CommandGroup::Theme,
        ),
        Theme::Light => Command::new(
            "☾",
            "Dark mode",
            "",
            CommandAction::ToggleTheme,
            CommandGroup::Theme,
        ),
    };

    let mut commands = Vec::with_capacity(3 + BLOCK_COMMANDS.len());
    commands.push(theme_command);
    commands.push(Command::new(
        "⤒",
        "Open .md",
        "",
        CommandAction::Upload,
        CommandGroup::File,
    ));
    commands.push(Command::new(
        "⤓",
        "Save as .md",
        "",
        CommandAction::Export,
        CommandGroup::File,
    ));
    commands.extend(BLOCK_COMMANDS.iter().cloned());
    commands
}

/// Case-insensitive substring filter over label, hint and id.
///
/// An empty query keeps every command in declared order.
pub fn filter_commands(commands: &[Command], query: &str) -> Vec<Command> {
    let needle = query.to_lowercase();
    commands
        .iter()
        .filter(|command| needle.is_empty() || command.matches(&needle))
        .cloned()
        .collect()
}

/// One row of the rendered palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteEntry<'a> {
    Separator,
    Command { index: usize, command: &'a Command },
}

/// Interleaves separators wherever the group changes between two commands.
pub fn with_separators(commands: &[Command]) -> Vec<PaletteEntry<'_>> {
    let mut entries = Vec::with_capacity(commands.len() + 2);
    let mut previous: Option<CommandGroup> = None;
    for (index, command) in commands.iter().enumerate() {
        if previous.is_some_and(|group| group != command.group) {
            entries.push(PaletteEntry::Separator);
        }
        previous = Some(command.group);
        entries.push(PaletteEntry::Command { index, command });
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::{default_commands, filter_commands, with_separators, CommandAction, PaletteEntry};
    use crate::model::theme::Theme;

    #[test]
    fn empty_query_keeps_declared_order() {
        let commands = default_commands(Theme::Dark);
        let filtered = filter_commands(&commands, "");
        assert_eq!(filtered, commands);
        assert_eq!(filtered[0].label, "Light mode");
        assert_eq!(default_commands(Theme::Light)[0].label, "Dark mode");
    }

    #[test]
    fn filter_matches_hint_and_id() {
        let commands = default_commands(Theme::Dark);
        let by_hint = filter_commands(&commands, "---");
        assert_eq!(by_hint.len(), 1);
        assert_eq!(by_hint[0].action, CommandAction::Divider);

        let by_id = filter_commands(&commands, "UL");
        assert_eq!(by_id[0].action, CommandAction::BulletList);
    }

    #[test]
    fn separators_only_between_groups() {
        let commands = default_commands(Theme::Dark);
        let entries = with_separators(&commands);
        let separators = entries
            .iter()
            .filter(|entry| matches!(entry, PaletteEntry::Separator))
            .count();
        assert_eq!(separators, 2);
        assert!(!matches!(entries[0], PaletteEntry::Separator));
    }
}
