use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use x402_dev_tools::{
    icon_gen,
    preflight::{self, Readiness},
};

#[derive(Debug, Parser)]
#[clap(
    name = "generate-icons",
    version,
    about = "Generate the X402 extension icons (16, 48 and 128 px) into icons/"
)]
struct Args {}

fn main() -> Result<ExitCode> {
    env_logger::init();
    let _args = Args::parse();

    let toolkit = match preflight::check() {
        Readiness::Ready(toolkit) => toolkit,
        Readiness::MissingDependency(missing) => {
            log::debug!("{}: {}", missing.capability, missing.cause);
            for line in missing.remediation() {
                println!("{line}");
            }
            return Ok(ExitCode::FAILURE);
        }
    };

    icon_gen::generate_icons(&toolkit, &icon_gen::default_icons_dir())?;
    Ok(ExitCode::SUCCESS)
}
