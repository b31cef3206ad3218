fn main() -> anyhow::Result<()> {
    simple_logger::SimpleLogger::new()
        .with_colors(true)
        .with_threads(true)
        .with_local_timestamps()
        .init()?;

    let channels = quarkfm_bridge::BridgeChannels::default();
    let backend = quarkfm_backend::run(channels.backend_rx, channels.backend_tx)?;
    log::info!("Backend started on thread {:?}", backend.thread().name());

    quarkfm_frontend::run(channels.frontend_rx, channels.frontend_tx)
}
