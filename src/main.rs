use menger::AppConfig;

fn main() {
    env_logger::init();

    if let Err(e) = menger::run(AppConfig::default()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
