use clap::Parser;
use crossterm::execute;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use std::io::{stdin, stdout, Write};
use std::path::PathBuf;
use suggest_core::logging::init_logging;
use suggest_core::{EngineConfig, Entry, JsonFileStore, SuggestError, SuggestionEngine, Suggestions};

#[derive(Parser, Debug)]
#[command(name = "suggest_engine", about = "Interactive dictionary suggestions")]
struct Args {
    /// Dictionary JSON file; seeded with the bundled words when empty
    #[arg(long, env = "SUGGEST_DATA", default_value = "dictionary.json")]
    data: PathBuf,

    /// Optional JSON file overriding the suggestion policy
    #[arg(long)]
    config: Option<PathBuf>,

    /// Debug logging, including per-stage timings
    #[arg(short, long)]
    verbose: bool,
}

type Engine = SuggestionEngine<JsonFileStore>;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    let engine = SuggestionEngine::open(JsonFileStore::new(&args.data), config)?;

    execute!(stdout(), Clear(ClearType::All))?;
    println!("{}", "Dictionary Suggestions".bold());
    println!("{} entries loaded from '{}'. Type ':help' for commands, 'exit' to quit.", engine.len(), args.data.display());
    println!("---------------------------------------------------------------");

    let mut last = Suggestions::default();
    loop {
        print!("\n> ");
        stdout().flush()?;

        let mut input = String::new();
        if stdin().read_line(&mut input)? == 0 {
            break;
        }
        let line = input.trim();

        let outcome = match line {
            "exit" => break,
            "" => Ok(()),
            ":help" => {
                print_help();
                Ok(())
            }
            ":list" => {
                for entry in engine.list_entries() {
                    print_entry(&entry);
                }
                Ok(())
            }
            ":reload" => engine.reload().map(|_| println!("Reloaded {} entries.", engine.len())),
            s if s.starts_with(':') => run_command(&engine, s, &last),
            query => {
                last = engine.suggest_with_timings(query);
                print_suggestions(&last);
                Ok(())
            }
        };

        if let Err(e) = outcome {
            println!("{} {}", "error:".red().bold(), e);
        }
    }
    Ok(())
}

fn run_command(engine: &Engine, line: &str, last: &Suggestions) -> Result<(), SuggestError> {
    let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    match cmd {
        ":pick" => {
            let word = rest
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| last.words.get(i))
                .ok_or_else(|| SuggestError::NotFound(format!("suggestion '{rest}'")))?;
            let updated = engine.increment_frequency(word)?;
            println!("Picked '{}' (frequency {}).", updated.word.as_str().green(), updated.frequency);
        }
        ":show" => match engine.find_entry(rest) {
            Some(entry) => print_entry(&entry),
            None => return Err(SuggestError::NotFound(rest.to_string())),
        },
        ":add" => {
            let entry = parse_entry(rest, None)?;
            let word = entry.word.clone();
            engine.add_entry(entry)?;
            println!("Added '{}'.", word.as_str().green());
        }
        ":edit" => {
            let word = rest.split('|').next().unwrap_or("").trim();
            let existing = engine.find_entry(word);
            let entry = parse_entry(rest, existing.as_ref())?;
            let word = entry.word.clone();
            engine.edit_entry(entry)?;
            println!("Saved '{}'.", word.as_str().green());
        }
        ":del" => {
            let removed = engine.delete_entry(rest)?;
            println!("Deleted '{}'.", removed.word.as_str().yellow());
        }
        other => println!("Unknown command '{other}'. Type ':help'."),
    }
    Ok(())
}

/// `word | meaning | tag1, tag2 | frequency`; trailing parts are optional and
/// default to the existing entry's values when editing.
fn parse_entry(spec: &str, existing: Option<&Entry>) -> Result<Entry, SuggestError> {
    let parts: Vec<&str> = spec.split('|').map(str::trim).collect();
    let word = parts.first().copied().unwrap_or("");
    if word.is_empty() {
        return Err(SuggestError::InvalidEntry("usage: word | meaning | tag1, tag2 | frequency".into()));
    }

    let meaning = match parts.get(1) {
        Some(m) => m.to_string(),
        None => existing.map(|e| e.meaning.clone()).unwrap_or_default(),
    };
    let tags: Vec<String> = match parts.get(2) {
        Some(t) => t.split(',').map(str::trim).filter(|t| !t.is_empty()).map(str::to_string).collect(),
        None => existing.map(|e| e.tags.clone()).unwrap_or_default(),
    };
    let frequency: u64 = match parts.get(3) {
        Some(f) => f
            .parse()
            .map_err(|_| SuggestError::InvalidEntry(format!("frequency '{f}' is not a number")))?,
        None => existing.map(|e| e.frequency).unwrap_or(0),
    };
    Ok(Entry::new(word, meaning, frequency, tags))
}

fn print_suggestions(result: &Suggestions) {
    if result.words.is_empty() {
        println!("No suggestions found.");
    } else {
        println!("\nSuggestions:");
        for (i, word) in result.words.iter().enumerate() {
            println!("  :{}: {}", i + 1, word.as_str().cyan());
        }
    }
    let fmt_stage = |d: Option<std::time::Duration>| match d {
        Some(d) => format!("{} µs", d.as_micros()),
        None => "skipped".to_string(),
    };
    let timings = &result.timings;
    let line = format!(
        "Trie: {} | Lev: {} | TF-IDF: {}",
        fmt_stage(Some(timings.prefix)),
        fmt_stage(timings.fuzzy),
        fmt_stage(timings.relevance)
    );
    println!("{}", line.dark_grey());
}

fn print_entry(entry: &Entry) {
    println!(
        "{} ({}): {} [{}]",
        entry.word.as_str().bold(),
        entry.frequency,
        entry.meaning,
        entry.tags.join(", ")
    );
}

fn print_help() {
    println!("Type any text to get suggestions.");
    println!("  :pick N                       confirm suggestion N (bumps its frequency)");
    println!("  :show word                    show one entry");
    println!("  :add word | meaning | tags    add or replace an entry");
    println!("  :edit word | meaning | tags   edit an entry in place");
    println!("  :del word                     delete an entry");
    println!("  :list                         list all entries");
    println!("  :reload                       reload from disk");
    println!("  exit                          quit");
}
