use pavilion::errors::Result;
use pavilion::{App, ViewerSettings};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = ViewerSettings::from_args();
    App::new(settings).run()
}
