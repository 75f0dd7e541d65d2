use blobdrift::BlobConfig;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args_os().nth(1) {
        Some(path) => match BlobConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}: {}", path.to_string_lossy(), e);
                std::process::exit(1);
            }
        },
        None => BlobConfig::default(),
    };

    if let Err(e) = blobdrift::run(config) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
