use doramas::{Config, run};

fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    run(config)
}
