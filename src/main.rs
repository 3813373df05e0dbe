use log::LevelFilter;
use simple_logger::SimpleLogger;

use taskchat::{config::Config, ui};

pub fn main() -> iced::Result {
    if let Err(err) = SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .env()
        .init()
    {
        eprintln!("Failed to initialise logging: {}", err);
    }

    let config = Config::load();
    log::info!("Chat endpoint: {}", config.chat_endpoint());

    iced::application(move || ui::init(config.clone()), ui::update, ui::view)
        .title("TaskChat")
        .run()
}
