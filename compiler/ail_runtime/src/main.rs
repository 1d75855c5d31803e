//! AIL runtime CLI
//!
//! Inspects the builtin modules through the object protocols.

use std::sync::Arc;

use ail_ir::CodeObject;
use ail_object::{AilError, TypeRegistry, Value};
use ail_runtime::{
    exit_status, init_tracing, load_module, module_names, print_error, Frame,
    MAIN_INTERPRETER_STATE,
};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error(transparent)]
    Runtime(#[from] AilError),
}

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    let main_code = Arc::new(CodeObject::builder("<main>", "<ail>").main(true).build());
    if let Err(err) = MAIN_INTERPRETER_STATE.lock().push_frame(Frame::new(main_code)) {
        eprintln!("{err}");
        std::process::exit(1);
    }

    let reg = TypeRegistry::global();
    match run(reg, &args[1..]) {
        Ok(()) => {}
        Err(CliError::Runtime(err)) => {
            let mut state = MAIN_INTERPRETER_STATE.lock();
            print_error(&state, &err);
            state.push_error(err);
        }
        Err(err) => {
            eprintln!("error: {err}");
            print_usage();
            std::process::exit(1);
        }
    }

    let status = {
        let mut state = MAIN_INTERPRETER_STATE.lock();
        state.pop_frame();
        exit_status(&state)
    };
    std::process::exit(status);
}

fn run(reg: &TypeRegistry, args: &[String]) -> Result<(), CliError> {
    match args[0].as_str() {
        "modules" => {
            for name in module_names() {
                println!("{name}");
            }
            Ok(())
        }
        "show" => {
            let [_, module] = args else {
                return Err(CliError::Usage("ail show <module>"));
            };
            show(reg, module)
        }
        "get" => {
            let [_, module, path] = args else {
                return Err(CliError::Usage("ail get <module> <attr>[.<attr>...]"));
            };
            get(reg, module, path)
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => Err(CliError::UnknownCommand(other.to_string())),
    }
}

fn show(reg: &TypeRegistry, name: &str) -> Result<(), CliError> {
    let module = load_module(reg, name)?;
    println!("{}", reg.stringify(&module)?);
    for attr in ail_object::module_attributes(&module) {
        let value = reg.get_attr(&module, &attr)?;
        println!("  {attr} = {}", reg.repr_value(&value)?);
    }
    Ok(())
}

/// Print the attribute at a dotted path, e.g. `NEZHA.friend.name`.
fn get(reg: &TypeRegistry, name: &str, path: &str) -> Result<(), CliError> {
    let mut current = Value::Object(load_module(reg, name)?);
    for attr in path.split('.') {
        let obj = reg.to_object(&current)?;
        current = reg.get_attr(&obj, attr)?;
    }
    println!("{}", reg.stringify_value(&current)?);
    Ok(())
}

fn print_usage() {
    println!("AIL runtime");
    println!();
    println!("Usage: ail <command> [options]");
    println!();
    println!("Commands:");
    println!("  modules                      List the builtin modules");
    println!("  show <module>                Print a builtin module's namespace");
    println!("  get <module> <attr>[.<attr>] Print one attribute");
    println!("  help                         Show this help message");
    println!();
    println!("Environment:");
    println!("  RUST_LOG=<filter>            Enable tracing (e.g. ail_object=trace)");
    println!("  AIL_LOG_TREE=1               Render spans as a tree");
}
