use clap::Parser;
use log::{error, info};
use socks5d::config::Config;
use socks5d::proxy::Socks5Server;
use tokio::runtime::Runtime;

fn main() {
    env_logger::builder()
        .format_timestamp(None)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = Config::parse();

    let rt = match Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("create runtime error: {}", e);
            std::process::exit(1);
        }
    };

    rt.block_on(async move {
        let server = match Socks5Server::listen(config.listen_addr()).await {
            Ok(server) => server,
            Err(e) => {
                error!("listen {} error: {}", config.listen_addr(), e);
                std::process::exit(1);
            }
        };

        info!("SOCKS5 listening on {}", config.listen_addr());
        server.run().await;
    });
}
