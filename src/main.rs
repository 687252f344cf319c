use std::io;
use webprobe::probe_engine::ProbeClient;
use webprobe::report::write_report;
use webprobe::settings::load_from_cli;

fn main() -> io::Result<()> {
    let settings = load_from_cli()
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err.to_string()))?;

    let default_level = if settings.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();
    log::debug!("settings: {settings:?}");

    let mut client = ProbeClient::new(settings.timeouts);
    let result = client
        .probe(&settings.target)
        .map_err(|err| io::Error::other(format!("{}: {err}", err.kind().label())))?;

    let mut stdout = io::stdout().lock();
    write_report(&mut stdout, &settings.target, &result, &settings.options)
        .map_err(|err| io::Error::other(err.to_string()))?;
    client.mark_reported();
    Ok(())
}
