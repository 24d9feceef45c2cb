use clap::builder::styling::{AnsiColor, Color, Style};
use clap::builder::Styles;
use crossterm::style::{Attribute, Color as CtColor, Stylize};
use unicode_width::UnicodeWidthStr;

// ═══════════════════════════════════════════════════════════════════════════════
// Clap Styles
// ═══════════════════════════════════════════════════════════════════════════════

pub fn get_styles() -> Styles {
    let bold = |color: AnsiColor| Style::new().bold().fg_color(Some(Color::Ansi(color)));
    Styles::styled()
        .usage(bold(AnsiColor::Yellow).underline())
        .header(bold(AnsiColor::Yellow).underline())
        .literal(bold(AnsiColor::Green))
        .invalid(bold(AnsiColor::Red))
        .error(bold(AnsiColor::Red))
        .valid(bold(AnsiColor::Green))
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Color Palette - Desert Theme
// ═══════════════════════════════════════════════════════════════════════════════

pub mod colors {
    use crossterm::style::Color;

    pub const SAND: Color = Color::Rgb {
        r: 237,
        g: 201,
        b: 175,
    };
    pub const AMBER: Color = Color::Rgb {
        r: 255,
        g: 191,
        b: 0,
    };
    pub const TERRACOTTA: Color = Color::Rgb {
        r: 226,
        g: 114,
        b: 91,
    };
    pub const TEAL: Color = Color::Rgb {
        r: 0,
        g: 200,
        b: 180,
    };
    pub const GREEN: Color = Color::Rgb {
        r: 0,
        g: 255,
        b: 136,
    };
    pub const RED: Color = Color::Rgb {
        r: 255,
        g: 85,
        b: 85,
    };
    pub const DIM: Color = Color::Rgb {
        r: 128,
        g: 128,
        b: 128,
    };
    pub const WHITE: Color = Color::Rgb {
        r: 255,
        g: 255,
        b: 255,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Box Drawing Characters
// ═══════════════════════════════════════════════════════════════════════════════

pub mod box_chars {
    pub const SINGLE_HORIZONTAL: &str = "─";
    pub const SINGLE_VERTICAL: &str = "│";

    pub const ROUND_TOP_LEFT: &str = "╭";
    pub const ROUND_TOP_RIGHT: &str = "╮";
    pub const ROUND_BOTTOM_LEFT: &str = "╰";
    pub const ROUND_BOTTOM_RIGHT: &str = "╯";

    pub const T_LEFT: &str = "├";
    pub const T_RIGHT: &str = "┤";
    pub const T_TOP: &str = "┬";
    pub const T_BOTTOM: &str = "┴";
    pub const CROSS: &str = "┼";

    pub const ARROW_RIGHT: &str = "▶";
    pub const BULLET: &str = "●";
    pub const BULLET_EMPTY: &str = "○";
    pub const DIAMOND: &str = "◆";
    pub const CROSS_MARK: &str = "✗";
}

// ═══════════════════════════════════════════════════════════════════════════════
// Banner
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_banner() {
    let banner = r#"
    ██████╗ ███████╗██╗   ██╗██╗███████╗██╗    ██╗███████╗
    ██╔══██╗██╔════╝██║   ██║██║██╔════╝██║    ██║██╔════╝
    ██████╔╝█████╗  ██║   ██║██║█████╗  ██║ █╗ ██║███████╗
    ██╔══██╗██╔══╝  ╚██╗ ██╔╝██║██╔══╝  ██║███╗██║╚════██║
    ██║  ██║███████╗ ╚████╔╝ ██║███████╗╚███╔███╔╝███████║
    ╚═╝  ╚═╝╚══════╝  ╚═══╝  ╚═╝╚══════╝ ╚══╝╚══╝ ╚══════╝
"#;

    let gradient_colors = [
        colors::SAND,
        colors::SAND,
        colors::AMBER,
        colors::AMBER,
        colors::TERRACOTTA,
        colors::TERRACOTTA,
        colors::TEAL,
    ];

    for (i, line) in banner.lines().enumerate() {
        let color = gradient_colors.get(i).unwrap_or(&colors::SAND);
        println!("{}", line.with(*color).bold());
    }

    let subtitle = "  ═══════════════════  TOURISM REVIEW INSIGHTS  ═══════════════════";
    println!("{}", subtitle.with(colors::DIM));
    println!();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Status Indicators
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_error(message: &str) {
    println!(
        " {} {}",
        box_chars::CROSS_MARK.to_string().with(colors::RED).bold(),
        message.with(colors::RED)
    );
}

pub fn print_warning(message: &str) {
    println!(
        " {} {}",
        "⚠".with(colors::AMBER).bold(),
        message.with(colors::AMBER)
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// Section Headers
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_section_header(title: &str) {
    let width: usize = 60;
    let title_len = title.width();
    let padding = width.saturating_sub(title_len + 4) / 2;

    println!();
    print!("{}", box_chars::ROUND_TOP_LEFT.with(colors::TEAL));
    print!(
        "{}",
        box_chars::SINGLE_HORIZONTAL
            .repeat(padding)
            .with(colors::TEAL)
    );
    print!(
        " {} ",
        title.with(colors::TEAL).bold().attribute(Attribute::Italic)
    );
    print!(
        "{}",
        box_chars::SINGLE_HORIZONTAL
            .repeat(width.saturating_sub(title_len + 4 + padding))
            .with(colors::TEAL)
    );
    println!("{}", box_chars::ROUND_TOP_RIGHT.with(colors::TEAL));
}

pub fn print_section_footer() {
    print!("{}", box_chars::ROUND_BOTTOM_LEFT.with(colors::TEAL));
    print!(
        "{}",
        box_chars::SINGLE_HORIZONTAL.repeat(60).with(colors::TEAL)
    );
    println!("{}", box_chars::ROUND_BOTTOM_RIGHT.with(colors::TEAL));
    println!();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Key-Value and List Display
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_key_value(key: &str, value: &str) {
    println!(
        "  {} {} {}",
        box_chars::BULLET.with(colors::AMBER),
        format!("{}:", key).with(colors::DIM),
        value.with(colors::WHITE)
    );
}

pub fn print_list_item(item: &str, indent: usize) {
    let indent_str = "  ".repeat(indent);
    println!(
        "{}{}  {}",
        indent_str,
        box_chars::ARROW_RIGHT.with(colors::TEAL),
        item.with(colors::WHITE)
    );
}

pub fn print_empty_list(message: &str) {
    println!(
        "  {} {}",
        box_chars::BULLET_EMPTY.with(colors::DIM),
        message.with(colors::DIM).attribute(Attribute::Italic)
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// Table Display
// ═══════════════════════════════════════════════════════════════════════════════

pub struct TableBuilder {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
}

impl TableBuilder {
    pub fn new(headers: Vec<&str>) -> Self {
        let col_widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
        TableBuilder {
            headers: headers.into_iter().map(String::from).collect(),
            rows: Vec::new(),
            col_widths,
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        for (i, cell) in row.iter().enumerate() {
            if i < self.col_widths.len() {
                self.col_widths[i] = self.col_widths[i].max(cell.width());
            }
        }
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn print_border(&self, left: &str, junction: &str, right: &str) {
        print!("{}", left.with(colors::TEAL));
        for (i, width) in self.col_widths.iter().enumerate() {
            print!(
                "{}",
                box_chars::SINGLE_HORIZONTAL
                    .repeat(width + 2)
                    .with(colors::TEAL)
            );
            if i + 1 < self.col_widths.len() {
                print!("{}", junction.with(colors::TEAL));
            }
        }
        println!("{}", right.with(colors::TEAL));
    }

    fn print_cells(&self, cells: &[String], color: CtColor, bold: bool) {
        print!("{}", box_chars::SINGLE_VERTICAL.with(colors::TEAL));
        for (i, cell) in cells.iter().enumerate() {
            let width = self.col_widths.get(i).copied().unwrap_or(0);
            let padding = width.saturating_sub(cell.width());
            let styled = cell.clone().with(color);
            let styled = if bold { styled.bold() } else { styled };
            print!(" {}{} ", styled, " ".repeat(padding));
            print!("{}", box_chars::SINGLE_VERTICAL.with(colors::TEAL));
        }
        println!();
    }

    /// Prints the table, or the `empty_message` line when there are no rows.
    pub fn print_or(&self, empty_message: &str) {
        if self.rows.is_empty() {
            print_empty_list(empty_message);
            return;
        }

        self.print_border(
            box_chars::ROUND_TOP_LEFT,
            box_chars::T_TOP,
            box_chars::ROUND_TOP_RIGHT,
        );
        self.print_cells(&self.headers, colors::TEAL, true);
        self.print_border(box_chars::T_LEFT, box_chars::CROSS, box_chars::T_RIGHT);
        for row in &self.rows {
            self.print_cells(row, colors::WHITE, false);
        }
        self.print_border(
            box_chars::ROUND_BOTTOM_LEFT,
            box_chars::T_BOTTOM,
            box_chars::ROUND_BOTTOM_RIGHT,
        );
    }
}

/// Two decimals, the precision the dashboard shows ratings and rates with.
pub fn fmt_number(value: f64) -> String {
    format!("{:.2}", value)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Prompt Styling
// ═══════════════════════════════════════════════════════════════════════════════

pub fn get_prompt() -> String {
    format!(
        "{}{}{} ",
        "❯".with(colors::SAND).bold(),
        "❯".with(colors::AMBER).bold(),
        "❯".with(colors::TERRACOTTA).bold(),
    )
}

pub fn print_command_echo(command: &str) {
    println!(
        "{}{}{}  {}",
        "❯".with(colors::SAND).bold(),
        "❯".with(colors::AMBER).bold(),
        "❯".with(colors::TERRACOTTA).bold(),
        command.with(colors::GREEN).bold()
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// Welcome Message
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_welcome(reviews_path: &str, reviews: usize, topics: Option<usize>) {
    print_banner();
    print_section_header("Dataset");
    print_key_value("File", reviews_path);
    print_key_value("Reviews", &reviews.to_string());
    match topics {
        Some(n) => print_key_value("Topics", &n.to_string()),
        None => print_key_value("Topics", "not loaded"),
    }
    print_key_value("Version", env!("CARGO_PKG_VERSION"));
    println!();
    print_empty_list("Type 'help' for available commands");
    print_section_footer();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Help Display
// ═══════════════════════════════════════════════════════════════════════════════

pub struct CommandHelp {
    pub name: &'static str,
    pub args: &'static str,
    pub description: &'static str,
}

pub fn print_help(commands: &[CommandHelp]) {
    print_section_header("Available Commands");
    println!();

    fn group<'a>(commands: &'a [CommandHelp], names: &[&str]) -> Vec<&'a CommandHelp> {
        commands.iter().filter(|c| names.contains(&c.name)).collect()
    }

    let filter_commands = group(
        commands,
        &["region", "city", "place-type", "place-name", "clear", "options"],
    );
    let table_commands = group(
        commands,
        &[
            "reviews",
            "sentiment",
            "sentiment-by",
            "compare",
            "top",
            "bottom",
            "ratings",
            "negatives",
            "mismatches",
        ],
    );
    let attention_commands = group(commands, &["attention", "attention-needed", "regions"]);
    let topic_commands = group(commands, &["topic", "topics"]);
    let system_commands = group(commands, &["where", "help", "exit"]);

    fn print_command_group(title: &str, commands: &[&CommandHelp], color: CtColor) {
        println!(
            "  {} {}",
            box_chars::DIAMOND.with(color),
            title.with(color).bold()
        );
        for cmd in commands {
            println!(
                "      {} {}  {}",
                cmd.name.with(colors::GREEN).bold(),
                cmd.args.with(colors::DIM),
                cmd.description.with(colors::WHITE)
            );
        }
        println!();
    }

    print_command_group("Filters", &filter_commands, colors::TEAL);
    print_command_group("Tables", &table_commands, colors::AMBER);
    print_command_group("Attention", &attention_commands, colors::TERRACOTTA);
    print_command_group("Topics", &topic_commands, colors::SAND);
    print_command_group("System", &system_commands, colors::DIM);

    print_section_footer();
}

pub fn print_goodbye() {
    println!();
    println!(
        "  {}",
        "Goodbye! Thanks for using the review insights CLI"
            .with(colors::AMBER)
            .bold()
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_widths_follow_widest_cell() {
        let mut table = TableBuilder::new(vec!["City", "Rate"]);
        assert!(table.is_empty());
        table.add_row(vec!["Jeddah".to_string(), fmt_number(33.333)]);
        table.add_row(vec!["Abha".to_string(), fmt_number(5.0)]);

        assert!(!table.is_empty());
        assert_eq!(table.col_widths, vec![6, 5]);
        assert_eq!(table.rows[0][1], "33.33");
    }
}
