use std::{
    env,
    io,
    process,
};

use budgetu_core::{
    cli::{clock_from_env, Shell, SCRIPT_ENV},
    config::ConfigManager,
    errors::CliError,
    init,
};

fn main() {
    init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    let manager = ConfigManager::new()?;
    let config = manager.load()?;
    let clock = clock_from_env()?;
    let stdout = io::stdout();
    let mut shell = Shell::new(config, Some(manager), clock, stdout.lock());

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() || env::var_os(SCRIPT_ENV).is_some() {
        let stdin = io::stdin();
        let failures = shell.run_script(stdin.lock())?;
        if failures > 0 {
            return Err(CliError::Command(format!(
                "{failures} script command(s) failed"
            )));
        }
    } else {
        shell.execute(&args)?;
    }
    Ok(())
}
