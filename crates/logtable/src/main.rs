use logtable::runtime::{boot, run};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    boot::init_logging();
    let (table, config) = boot::boot(std::env::args().nth(1))?;
    run::run(table, &config)
}
