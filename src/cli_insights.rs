use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

mod cli_style;

use cli_style::{
    fmt_number, get_prompt, get_styles, print_command_echo, print_error, print_goodbye,
    print_help, print_key_value, print_list_item, print_section_footer, print_section_header,
    print_warning, print_welcome, CommandHelp, TableBuilder,
};

use review_insights::config::{AppConfig, CliConfig, FileConfig};
use review_insights::insights::{
    attention_needed, bottom_rated, compare_regions, find_mismatches, places_with_most_negatives,
    ratings_ranked, region_priority, sentiment_by, sentiment_distribution, top_attention,
    top_rated, CitySummary, FilterLevel, FilterSelection, GroupKey, RatingGroup, RegionSentiment,
    RegionSide, NO_DATA_MESSAGE, PLACE_KEYS,
};
use review_insights::reviews::{Review, ReviewDataset};
use review_insights::topics::{topic_distribution, TopicError, TopicInsights};

use rustyline::{
    completion::Completer, highlight::Highlighter, history::FileHistory, validate::Validator,
    CompletionType, Config, Editor, Helper,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(styles=get_styles())]
struct CliArgs {
    /// Path to the reviews CSV file. Can also be specified in config file.
    #[clap(value_parser = parse_path)]
    pub reviews_path: Option<PathBuf>,

    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// JSON export of the fitted topic model.
    #[clap(long, value_parser = parse_path, requires = "vocabulary")]
    pub topic_model: Option<PathBuf>,

    /// JSON export of the vectorizer vocabulary.
    #[clap(long, value_parser = parse_path, requires = "topic_model")]
    pub vocabulary: Option<PathBuf>,
}

#[derive(Parser)]
#[command(styles=get_styles(), name = "", disable_help_subcommand = true)]
struct InnerCli {
    #[command(subcommand)]
    command: InnerCommand,
}

#[derive(Subcommand)]
enum InnerCommand {
    /// Selects regions. No values clears the selection.
    Region { values: Vec<String> },

    /// Selects cities within the selected regions.
    City { values: Vec<String> },

    /// Selects place types within the selected cities.
    PlaceType { values: Vec<String> },

    /// Selects place names within the selected place types.
    PlaceName { values: Vec<String> },

    /// Clears every selection.
    Clear,

    /// Shows the values available at each filter level.
    Options,

    /// Lists the filtered reviews.
    Reviews {
        #[clap(default_value_t = 20)]
        limit: usize,
    },

    /// Sentiment distribution of the filtered reviews.
    Sentiment,

    /// Sentiment counts per group, e.g. `sentiment-by place_type`.
    SentimentBy {
        #[clap(default_value = "place_type")]
        key: String,
    },

    /// Compares the sentiment of two regions.
    Compare {
        first: String,
        second: String,
        #[clap(long, num_args = 1..)]
        first_types: Vec<String>,
        #[clap(long, num_args = 1..)]
        second_types: Vec<String>,
    },

    /// Top rated places.
    Top { n: Option<usize> },

    /// Lowest rated places.
    Bottom { n: Option<usize> },

    /// Mean rating per group, highest first, e.g. `ratings region place_type`.
    Ratings { keys: Vec<String> },

    /// Cities ranked by attention score.
    Attention { n: Option<usize> },

    /// Cities over the negative-rate threshold and under the rating cap.
    AttentionNeeded,

    /// Regions counted by their cities among the top attention scores.
    Regions,

    /// Places with the most negative reviews.
    Negatives { n: Option<usize> },

    /// Reviews whose text reads negative while the rating is high.
    Mismatches { n: Option<usize> },

    /// Describes a topic of the loaded model.
    Topic {
        index: usize,
        #[clap(long)]
        words: Option<usize>,
    },

    /// Lists topics and their share of the filtered reviews.
    Topics,

    /// Shows the loaded files and the current selection.
    Where,

    /// Shows this help.
    Help,

    /// Close this program.
    Exit,
}

enum CommandExecutionResult {
    Ok,
    Exit,
    Error(String),
}

/// Read-only data the commands run against.
struct Workspace {
    config: AppConfig,
    dataset: ReviewDataset,
    topics: Option<TopicInsights>,
}

impl Workspace {
    fn filtered(&self, selection: &FilterSelection) -> Vec<&Review> {
        selection.apply(self.dataset.reviews())
    }

    fn topics(&self) -> Result<&TopicInsights, String> {
        self.topics
            .as_ref()
            .ok_or_else(|| "No topic model loaded, pass --topic-model and --vocabulary.".to_string())
    }
}

fn parse_keys(raw: &[String]) -> Result<Vec<GroupKey>, String> {
    if raw.is_empty() {
        return Ok(vec![GroupKey::PlaceType]);
    }
    raw.iter().map(|k| k.parse::<GroupKey>()).collect()
}

fn key_header(key: &GroupKey) -> &'static str {
    match key {
        GroupKey::Region => "Region",
        GroupKey::City => "City",
        GroupKey::PlaceType => "Place Type",
        GroupKey::PlaceName => "Place Name",
        GroupKey::PlaceCategory => "Place Category",
        GroupKey::Sentiment => "Sentiment",
    }
}

fn print_rating_groups(title: &str, keys: &[GroupKey], groups: &[RatingGroup]) {
    print_section_header(title);
    let mut headers: Vec<&str> = keys.iter().map(key_header).collect();
    headers.extend(["Rating", "Reviews"]);
    let mut table = TableBuilder::new(headers);
    for group in groups {
        let mut row = group.keys.clone();
        row.push(fmt_number(group.mean_rating));
        row.push(group.count.to_string());
        table.add_row(row);
    }
    table.print_or(NO_DATA_MESSAGE);
}

fn print_cities(title: &str, cities: &[CitySummary]) {
    print_section_header(title);
    let mut table = TableBuilder::new(vec![
        "Region",
        "City",
        "Total",
        "Negative",
        "Negative %",
        "Rating",
        "Score",
    ]);
    for city in cities {
        table.add_row(vec![
            city.region.clone(),
            city.city.clone(),
            city.total_reviews.to_string(),
            city.negative_reviews.to_string(),
            fmt_number(city.negative_rate),
            fmt_number(city.rating),
            fmt_number(city.score),
        ]);
    }
    table.print_or(NO_DATA_MESSAGE);
}

fn print_reviews(title: &str, reviews: &[&Review]) {
    print_section_header(title);
    let mut table = TableBuilder::new(vec![
        "Region",
        "City",
        "Place Name",
        "Rating",
        "Sentiment",
        "Compound",
        "Review",
    ]);
    for review in reviews {
        let text: String = review
            .review_text
            .as_deref()
            .unwrap_or("")
            .chars()
            .take(60)
            .collect();
        table.add_row(vec![
            review.region.clone(),
            review.city.clone(),
            review.place_name.clone(),
            fmt_number(review.rating),
            review.sentiment.to_string(),
            fmt_number(review.compound),
            text,
        ]);
    }
    table.print_or(NO_DATA_MESSAGE);
}

fn print_region_sentiment(side: &RegionSentiment) {
    let title = if side.place_types.is_empty() {
        side.region.clone()
    } else {
        format!("{} ({})", side.region, side.place_types.join(", "))
    };
    print_section_header(&title);
    let mut table = TableBuilder::new(vec!["Sentiment", "Reviews", "%"]);
    if side.total > 0 {
        for share in &side.distribution {
            table.add_row(vec![
                share.sentiment.to_string(),
                share.count.to_string(),
                fmt_number(share.percentage),
            ]);
        }
    }
    table.print_or(NO_DATA_MESSAGE);
}

fn print_selection(selection: &FilterSelection) {
    let show = |values: &[String]| {
        if values.is_empty() {
            "(all)".to_string()
        } else {
            values.join(", ")
        }
    };
    print_key_value("Regions", &show(&selection.regions));
    print_key_value("Cities", &show(&selection.cities));
    print_key_value("Place types", &show(&selection.place_types));
    print_key_value("Place names", &show(&selection.place_names));
}

fn describe_topic(topics: &TopicInsights, index: usize, words: Option<usize>) -> Result<(), TopicError> {
    let summary = topics.summarize(index, words)?;
    print_section_header(&format!("Topic {}", summary.topic));
    let mut table = TableBuilder::new(vec!["Word", "Weight"]);
    for word in &summary.words {
        table.add_row(vec![word.word.clone(), format!("{:.4}", word.weight)]);
    }
    table.print_or(NO_DATA_MESSAGE);
    if !summary.tags.is_empty() {
        print_key_value("Tags", &summary.tags.join(", "));
    }
    println!();
    println!("  {}", summary.interpretation);
    if !summary.recommendations.is_empty() {
        println!();
        for recommendation in &summary.recommendations {
            print_list_item(recommendation, 1);
        }
    }
    print_section_footer();
    Ok(())
}

const COMMANDS: &[CommandHelp] = &[
    CommandHelp { name: "region", args: "[values..]", description: "Select regions, no values clears" },
    CommandHelp { name: "city", args: "[values..]", description: "Select cities within the regions" },
    CommandHelp { name: "place-type", args: "[values..]", description: "Select place types within the cities" },
    CommandHelp { name: "place-name", args: "[values..]", description: "Select places within the place types" },
    CommandHelp { name: "clear", args: "", description: "Clear every selection" },
    CommandHelp { name: "options", args: "", description: "Values available at each filter level" },
    CommandHelp { name: "reviews", args: "[limit]", description: "List the filtered reviews" },
    CommandHelp { name: "sentiment", args: "", description: "Sentiment distribution" },
    CommandHelp { name: "sentiment-by", args: "[key]", description: "Sentiment counts per group" },
    CommandHelp { name: "compare", args: "<first> <second> [--first-types ..] [--second-types ..]", description: "Compare two regions" },
    CommandHelp { name: "top", args: "[n]", description: "Top rated places" },
    CommandHelp { name: "bottom", args: "[n]", description: "Lowest rated places" },
    CommandHelp { name: "ratings", args: "[keys..]", description: "Mean rating per group" },
    CommandHelp { name: "negatives", args: "[n]", description: "Places with most negative reviews" },
    CommandHelp { name: "mismatches", args: "[n]", description: "High ratings with negative text" },
    CommandHelp { name: "attention", args: "[n]", description: "Cities ranked by attention score" },
    CommandHelp { name: "attention-needed", args: "", description: "Cities over the attention thresholds" },
    CommandHelp { name: "regions", args: "", description: "Regions to prioritize" },
    CommandHelp { name: "topic", args: "<index> [--words n]", description: "Describe one topic" },
    CommandHelp { name: "topics", args: "", description: "Topic shares and tags" },
    CommandHelp { name: "where", args: "", description: "Loaded files and current selection" },
    CommandHelp { name: "help", args: "", description: "Show this help" },
    CommandHelp { name: "exit", args: "", description: "Close this program" },
];

fn execute_command(
    line: String,
    selection: &mut FilterSelection,
    workspace: &Workspace,
) -> CommandExecutionResult {
    if line.is_empty() {
        return CommandExecutionResult::Ok;
    }

    let args =
        shlex::split(&line).unwrap_or_else(|| line.split_whitespace().map(String::from).collect());

    let cli = InnerCli::try_parse_from(std::iter::once(" ").chain(args.iter().map(String::as_str)));

    match cli {
        Ok(cli) => {
            print_command_echo(&line);
            let settings = &workspace.config.attention;
            let default_limit = workspace.config.default_limit;
            match cli.command {
                InnerCommand::Region { values } => selection.set(FilterLevel::Region, values),
                InnerCommand::City { values } => selection.set(FilterLevel::City, values),
                InnerCommand::PlaceType { values } => selection.set(FilterLevel::PlaceType, values),
                InnerCommand::PlaceName { values } => selection.set(FilterLevel::PlaceName, values),
                InnerCommand::Clear => *selection = FilterSelection::default(),
                InnerCommand::Options => {
                    let options = selection.options(workspace.dataset.reviews());
                    print_section_header("Filter options");
                    print_key_value("Regions", &options.regions.join(", "));
                    print_key_value("Cities", &options.cities.join(", "));
                    print_key_value("Place types", &options.place_types.join(", "));
                    print_key_value("Place names", &options.place_names.join(", "));
                    print_section_footer();
                }
                InnerCommand::Reviews { limit } => {
                    let mut rows = workspace.filtered(selection);
                    let total = rows.len();
                    rows.truncate(limit);
                    print_reviews(&format!("Reviews ({} of {})", rows.len(), total), &rows);
                }
                InnerCommand::Sentiment => {
                    let rows = workspace.filtered(selection);
                    print_section_header("Sentiment distribution");
                    let mut table = TableBuilder::new(vec!["Sentiment", "Reviews", "%"]);
                    if !rows.is_empty() {
                        for share in sentiment_distribution(&rows) {
                            table.add_row(vec![
                                share.sentiment.to_string(),
                                share.count.to_string(),
                                fmt_number(share.percentage),
                            ]);
                        }
                    }
                    table.print_or(NO_DATA_MESSAGE);
                }
                InnerCommand::SentimentBy { key } => {
                    let key = match key.parse::<GroupKey>() {
                        Ok(key) => key,
                        Err(err) => return CommandExecutionResult::Error(err),
                    };
                    let rows = workspace.filtered(selection);
                    print_section_header(&format!("Sentiment by {}", key_header(&key)));
                    let mut table =
                        TableBuilder::new(vec![key_header(&key), "Positive", "Neutral", "Negative"]);
                    for group in sentiment_by(&rows, key) {
                        table.add_row(vec![
                            group.key,
                            group.counts.positive.to_string(),
                            group.counts.neutral.to_string(),
                            group.counts.negative.to_string(),
                        ]);
                    }
                    table.print_or(NO_DATA_MESSAGE);
                }
                InnerCommand::Compare {
                    first,
                    second,
                    first_types,
                    second_types,
                } => {
                    let rows = workspace.filtered(selection);
                    let (first, second) = compare_regions(
                        &rows,
                        &RegionSide {
                            region: first,
                            place_types: first_types,
                        },
                        &RegionSide {
                            region: second,
                            place_types: second_types,
                        },
                    );
                    print_region_sentiment(&first);
                    print_region_sentiment(&second);
                }
                InnerCommand::Top { n } => {
                    let rows = workspace.filtered(selection);
                    let groups = top_rated(&rows, &PLACE_KEYS, n.unwrap_or(default_limit));
                    print_rating_groups("Top rated places", &PLACE_KEYS, &groups);
                }
                InnerCommand::Bottom { n } => {
                    let rows = workspace.filtered(selection);
                    let groups = bottom_rated(&rows, &PLACE_KEYS, n.unwrap_or(default_limit));
                    print_rating_groups("Lowest rated places", &PLACE_KEYS, &groups);
                }
                InnerCommand::Ratings { keys } => {
                    let keys = match parse_keys(&keys) {
                        Ok(keys) => keys,
                        Err(err) => return CommandExecutionResult::Error(err),
                    };
                    let rows = workspace.filtered(selection);
                    print_rating_groups("Average rating", &keys, &ratings_ranked(&rows, &keys));
                }
                InnerCommand::Attention { n } => {
                    let rows = workspace.filtered(selection);
                    let cities = top_attention(&rows, settings, n.unwrap_or(settings.top_n));
                    print_cities("Cities by attention score", &cities);
                }
                InnerCommand::AttentionNeeded => {
                    let rows = workspace.filtered(selection);
                    print_cities("Cities needing attention", &attention_needed(&rows, settings));
                }
                InnerCommand::Regions => {
                    let rows = workspace.filtered(selection);
                    let priority = region_priority(&top_attention(&rows, settings, settings.top_n));
                    print_section_header("Regions to prioritize");
                    let mut table = TableBuilder::new(vec!["Region", "Cities"]);
                    for region in priority {
                        table.add_row(vec![region.region, region.cities.to_string()]);
                    }
                    table.print_or(NO_DATA_MESSAGE);
                }
                InnerCommand::Negatives { n } => {
                    let rows = workspace.filtered(selection);
                    let places = places_with_most_negatives(&rows, n.unwrap_or(default_limit));
                    print_section_header("Places with most negative reviews");
                    let mut table = TableBuilder::new(vec![
                        "Region",
                        "City",
                        "Place Type",
                        "Place Name",
                        "Negative",
                        "Rating",
                    ]);
                    for place in places {
                        table.add_row(vec![
                            place.region,
                            place.city,
                            place.place_type,
                            place.place_name,
                            place.negative_reviews.to_string(),
                            fmt_number(place.rating),
                        ]);
                    }
                    table.print_or(NO_DATA_MESSAGE);
                }
                InnerCommand::Mismatches { n } => {
                    let rows = workspace.filtered(selection);
                    let mismatches = find_mismatches(
                        &rows,
                        &workspace.config.mismatch,
                        Some(n.unwrap_or(default_limit)),
                    );
                    print_reviews("High ratings with negative text", &mismatches);
                }
                InnerCommand::Topic { index, words } => {
                    let topics = match workspace.topics() {
                        Ok(topics) => topics,
                        Err(err) => return CommandExecutionResult::Error(err),
                    };
                    if let Err(err) = describe_topic(topics, index, words) {
                        return CommandExecutionResult::Error(err.to_string());
                    }
                }
                InnerCommand::Topics => {
                    let topics = match workspace.topics() {
                        Ok(topics) => topics,
                        Err(err) => return CommandExecutionResult::Error(err),
                    };
                    let rows = workspace.filtered(selection);
                    print_section_header(&format!("{} topics", topics.n_topics()));
                    let mut table = TableBuilder::new(vec!["Topic", "Reviews", "%", "Tags"]);
                    for share in topic_distribution(&rows) {
                        let tags = match topics.tags(share.topic) {
                            Ok(tags) => tags,
                            Err(err) => return CommandExecutionResult::Error(err.to_string()),
                        };
                        table.add_row(vec![
                            share.topic.to_string(),
                            share.reviews.to_string(),
                            fmt_number(share.percentage),
                            tags.join(", "),
                        ]);
                    }
                    table.print_or(NO_DATA_MESSAGE);
                }
                InnerCommand::Where => {
                    print_section_header("Loaded data");
                    print_key_value(
                        "Reviews file",
                        &workspace.config.reviews_path.display().to_string(),
                    );
                    match &workspace.config.topics {
                        Some(topics) => {
                            print_key_value("Topic model", &topics.model_path.display().to_string());
                            print_key_value(
                                "Vocabulary",
                                &topics.vocabulary_path.display().to_string(),
                            );
                        }
                        None => print_key_value("Topic model", "not loaded"),
                    }
                    print_selection(selection);
                    print_section_footer();
                }
                InnerCommand::Help => print_help(COMMANDS),
                InnerCommand::Exit => return CommandExecutionResult::Exit,
            }
        }

        Err(e) => {
            if e.print().is_err() {
                println!("{}", e);
            }
        }
    }
    CommandExecutionResult::Ok
}

#[derive(rustyline_derive::Hinter)]
struct InsightsHelper {
    commands_names: Vec<String>,
}

impl InsightsHelper {
    pub fn new() -> Self {
        let commands_names: Vec<String> = InnerCli::command()
            .get_subcommands()
            .map(|sc| sc.get_name().to_string())
            .collect();

        InsightsHelper { commands_names }
    }
}

impl Completer for InsightsHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        if line.contains(' ') {
            return Ok((0, Vec::with_capacity(0)));
        }
        let matches = self
            .commands_names
            .iter()
            .filter(|c| c.starts_with(line))
            .cloned()
            .collect::<Vec<_>>();

        Ok((0, matches))
    }
}

impl Highlighter for InsightsHelper {}
impl Validator for InsightsHelper {}
impl Helper for InsightsHelper {}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let cli_config = CliConfig {
        reviews_path: cli_args.reviews_path.clone(),
        topic_model_path: cli_args.topic_model.clone(),
        vocabulary_path: cli_args.vocabulary.clone(),
        ..Default::default()
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    let dataset = ReviewDataset::load(&config.reviews_path, &config.place_aliases)
        .with_context(|| format!("Failed to load reviews from {:?}", config.reviews_path))?;
    let topics = config
        .load_topic_insights(dataset.reviews())
        .context("Failed to load topic model artifacts")?;

    print_welcome(
        &config.reviews_path.display().to_string(),
        dataset.len(),
        topics.as_ref().map(|t| t.n_topics()),
    );
    if dataset.is_empty() {
        print_warning("The reviews file has no rows, every table will be empty.");
    }

    let workspace = Workspace {
        config,
        dataset,
        topics,
    };
    let mut selection = FilterSelection::default();

    let rl_config = Config::builder()
        .completion_type(CompletionType::List)
        .build();

    let mut rl = Editor::<InsightsHelper, FileHistory>::with_config(rl_config)?;
    rl.set_helper(Some(InsightsHelper::new()));

    let prompt = get_prompt();
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                match execute_command(line.trim().to_string(), &mut selection, &workspace) {
                    CommandExecutionResult::Ok => {}
                    CommandExecutionResult::Exit => {
                        print_goodbye();
                        break;
                    }
                    CommandExecutionResult::Error(err) => {
                        print_error(&err);
                        continue;
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("CTRL-D: exiting.");
                break;
            }
            Err(e) => {
                println!("Error: {:?}", e);
                break;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> InnerCommand {
        let args = shlex::split(line).unwrap();
        InnerCli::try_parse_from(std::iter::once(" ").chain(args.iter().map(String::as_str)))
            .unwrap()
            .command
    }

    #[test]
    fn parses_filter_commands() {
        match parse("place-type Museum \"Water Park\"") {
            InnerCommand::PlaceType { values } => {
                assert_eq!(values, vec!["Museum", "Water Park"])
            }
            _ => panic!("Expected place-type"),
        }
        match parse("region") {
            InnerCommand::Region { values } => assert!(values.is_empty()),
            _ => panic!("Expected region"),
        }
    }

    #[test]
    fn parses_table_commands() {
        assert!(matches!(parse("top 5"), InnerCommand::Top { n: Some(5) }));
        assert!(matches!(parse("attention"), InnerCommand::Attention { n: None }));
        assert!(matches!(parse("reviews"), InnerCommand::Reviews { limit: 20 }));
        assert!(matches!(
            parse("topic 3 --words 5"),
            InnerCommand::Topic {
                index: 3,
                words: Some(5)
            }
        ));
        assert!(matches!(parse("help"), InnerCommand::Help));
    }

    #[test]
    fn rating_keys_default_to_place_type() {
        assert_eq!(parse_keys(&[]).unwrap(), vec![GroupKey::PlaceType]);
        assert_eq!(
            parse_keys(&["region".to_string(), "place_type".to_string()]).unwrap(),
            vec![GroupKey::Region, GroupKey::PlaceType]
        );
        assert!(parse_keys(&["stars".to_string()]).is_err());
    }

    #[test]
    fn help_lists_every_command() {
        let names: Vec<String> = InnerCli::command()
            .get_subcommands()
            .map(|sc| sc.get_name().to_string())
            .collect();
        assert_eq!(names.len(), COMMANDS.len());
        for help in COMMANDS {
            assert!(names.iter().any(|n| n == help.name), "{}", help.name);
        }
    }
}
