use anyhow::Result;

fn main() -> Result<()> {
    pyseer_plot::cli::run()
}
