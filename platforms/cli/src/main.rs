use clap::Parser;
use std::path::Path;
use std::process::exit;
use std::thread;
use std::time::Duration;
use triomata::engine::Engine;
use triomata::library::Library;
use triomata::loader::DefinitionLoader;
use triomata::types::{Automaton, Formalism, RunStatus};

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// The automaton definition file to execute (.aut or .json)
    #[clap(short, long, conflicts_with_all = ["example", "list"])]
    file: Option<String>,

    /// Run a bundled example by name
    #[clap(short, long, conflicts_with = "list")]
    example: Option<String>,

    /// List the bundled examples and exit
    #[clap(short, long)]
    list: bool,

    /// Input string (overrides the definition's bundled input)
    #[clap(short, long)]
    input: Option<String>,

    /// Print each step of the execution
    #[clap(short = 'd', long)]
    debug: bool,

    /// Pause between steps, in milliseconds (implies --debug)
    #[clap(long)]
    delay: Option<u64>,
}

fn main() {
    let cli = Cli::parse();

    if cli.list {
        list_examples();
        return;
    }

    let automaton = match load_automaton(&cli) {
        Ok(automaton) => automaton,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    };

    let mut engine = match match cli.input {
        Some(ref input) => Engine::with_input(automaton, input),
        None => Engine::new(automaton),
    } {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    };

    let status = if cli.debug || cli.delay.is_some() {
        run_traced(&mut engine, cli.delay)
    } else {
        engine.run()
    };

    print_outcome(&engine, status);

    if status != RunStatus::Accepted {
        exit(1);
    }
}

fn load_automaton(cli: &Cli) -> Result<Automaton, triomata::types::AutomatonError> {
    if let Some(ref name) = cli.example {
        return Library::by_name(name);
    }
    if let Some(ref file) = cli.file {
        return DefinitionLoader::load(Path::new(file));
    }
    Err(triomata::types::AutomatonError::FileError(
        "No definition given; use --file, --example, or --list".to_string(),
    ))
}

fn list_examples() {
    for index in 0..Library::count() {
        if let Ok(info) = Library::info(index) {
            println!(
                "{:>3}. [{}] {} ({} states, {} transitions, input: {:?})",
                info.index, info.formalism, info.name, info.state_count, info.transition_count, info.input
            );
        }
    }
}

fn run_traced(engine: &mut Engine, delay: Option<u64>) -> RunStatus {
    print_step_line(engine);

    loop {
        let Some(event) = engine.step() else {
            break;
        };

        if let Some(ref delay) = delay {
            thread::sleep(Duration::from_millis(*delay));
        }

        if let Some(ref transition) = event.taken {
            println!(
                "  {} --[{}]--> {}",
                transition.from, transition.label, transition.to
            );
        }
        print_step_line(engine);

        engine.complete_step();
        if event.status.is_terminal() {
            break;
        }
    }

    engine.status()
}

fn print_step_line(engine: &Engine) {
    let snapshot = engine.snapshot();
    match engine.automaton().formalism {
        Formalism::Fa => println!(
            "Step: {}, State: {}, Cursor: {}",
            engine.step_count(),
            snapshot.state,
            snapshot.cursor
        ),
        Formalism::Pda => println!(
            "Step: {}, State: {}, Cursor: {}, Stack: {}",
            engine.step_count(),
            snapshot.state,
            snapshot.cursor,
            snapshot.stack.iter().collect::<String>()
        ),
        Formalism::Tm => println!(
            "Step: {}, State: {}, Head: {}, Tape: {}",
            engine.step_count(),
            snapshot.state,
            snapshot.head,
            snapshot.tape.iter().collect::<String>()
        ),
    }
}

fn print_outcome(engine: &Engine, status: RunStatus) {
    if engine.automaton().formalism == Formalism::Tm {
        println!("{}", engine.config().tape.contents());
    }
    println!("{}", status);
}
