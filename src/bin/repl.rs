use clap::{Parser, ValueEnum};
use rand::{rngs::StdRng, RngCore, SeedableRng};
use rollcalc::parse::{Parser as ExprParser, DEFAULT_MAX_DEPTH};
use rollcalc::roll::{MarkdownStringifier, SimpleStringifier, Stringify, DEFAULT_MAX_ROLLS};
use rollcalc::RollContext;
use std::error::Error;
use std::io::{self, BufRead, Write};

/// Rolls dice expressions such as `3d6kh2 + 4`, one per line.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Roll this expression once and exit instead of reading stdin.
    expression: Option<String>,

    /// Seed the dice so rolls are reproducible.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Most dice one expression may roll. 0 means no limit.
    #[arg(long, default_value_t = DEFAULT_MAX_ROLLS)]
    max_rolls: usize,

    /// Deepest nesting of parentheses and operators allowed. 0 means no limit.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Print parse problems as warnings and roll anyway.
    #[arg(short, long)]
    lenient: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Format {
    Text,
    Markdown,
    Json,
}

struct Repl {
    ctx: RollContext<Box<dyn RngCore>>,
    max_depth: Option<usize>,
    format: Format,
    lenient: bool,
}

impl Repl {
    fn roll(&mut self, input: &str) -> Result<String, Box<dyn Error>> {
        let parsed = ExprParser::new(input).with_max_depth(self.max_depth).parse();
        let program = if self.lenient {
            for diagnostic in &parsed.diagnostics {
                eprintln!("warning: {}", diagnostic);
            }
            parsed.program
        } else {
            parsed.into_result().map_err(rollcalc::Error::from)?
        };

        let outcome = self
            .ctx
            .eval(&program)
            .into_outcome()
            .map_err(rollcalc::Error::from)?;
        Ok(match self.format {
            Format::Text => SimpleStringifier::new().stringify(&outcome),
            Format::Markdown => MarkdownStringifier::new().stringify(&outcome),
            Format::Json => serde_json::to_string(&outcome)?,
        })
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let rng: Box<dyn RngCore> = match args.seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::thread_rng()),
    };
    let max_rolls = (args.max_rolls > 0).then(|| args.max_rolls);
    let max_depth = (args.max_depth > 0).then(|| args.max_depth);
    log::debug!(
        "max rolls {:?}, max depth {:?}, seed {:?}",
        max_rolls,
        max_depth,
        args.seed
    );

    let mut repl = Repl {
        ctx: RollContext::new(max_rolls, rng),
        max_depth,
        format: args.format,
        lenient: args.lenient,
    };

    if let Some(expression) = &args.expression {
        match repl.roll(expression) {
            Ok(r) => println!("{}", r),
            Err(why) => {
                eprintln!("Error: {}", why);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    print!("> ");
    io::stdout().flush()?;
    while let Some(line) = lines.next() {
        let line = line?;
        if !line.trim().is_empty() {
            match repl.roll(&line) {
                Ok(r) => println!("{}", r),
                Err(why) => eprintln!("Error: {}", why),
            }
        }
        print!("> ");
        io::stdout().flush()?;
    }
    println!();
    Ok(())
}
