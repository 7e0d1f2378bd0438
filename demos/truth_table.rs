use clap::Parser;

use worlds_rs::formula::{Formula, Op};
use worlds_rs::predicate::Predicate;
use worlds_rs::render::{render, Style};
use worlds_rs::types::Domain;
use worlds_rs::universe::{Universe, UniverseConfig};

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Number of nullary predicates.
    #[arg(value_name = "INT", default_value = "2")]
    n: usize,

    /// Quantifier domain size.
    #[clap(long, value_name = "INT", default_value = "3")]
    domain: usize,

    /// Largest number of columns to enumerate.
    #[clap(long, value_name = "INT", default_value = "20")]
    max_columns: usize,

    /// Print formulas in LaTeX.
    #[clap(long)]
    latex: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let args = Cli::parse();
    println!("args = {:?}", args);

    color_eyre::eyre::ensure!(args.n >= 2, "need at least 2 predicates, got {}", args.n);
    color_eyre::eyre::ensure!(args.domain >= 1, "domain size must be >= 1");

    let domain = Domain::new(args.domain);
    let preds: Vec<Formula> = (0..args.n)
        .map(|i| Predicate::new(domain, format!("p{}", i), 0).atom())
        .collect();

    let mut formulas = Vec::new();
    for op in Op::ALL {
        let f = if op == Op::Not {
            Formula::not(preds[0].clone())
        } else {
            Formula::op(op, preds.clone())?
        };
        formulas.push(f);
    }

    let config = UniverseConfig {
        max_columns: args.max_columns,
    };
    let universe = Universe::from_formulas(&formulas, config)?;
    println!("universe: {} worlds", universe.len());

    let refs: Vec<&Formula> = formulas.iter().collect();
    let table = universe.truth_table(&refs)?;

    let style = if args.latex { Style::Latex } else { Style::Plain };
    for (i, f) in formulas.iter().enumerate() {
        println!("F{} = {}", i, render(f, style));
    }

    let mut header: Vec<String> = table.header()[..table.num_columns()].to_vec();
    header.extend((0..table.num_formulas()).map(|i| format!("F{}", i)));
    println!("{}", header.join("\t"));
    for row in table.rows() {
        let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
        println!("{}", cells.join("\t"));
    }

    let a = &preds[0];
    for f in &formulas {
        if universe.entails(f, a)? {
            println!("{} entails {}", f, a);
        }
    }

    Ok(())
}
