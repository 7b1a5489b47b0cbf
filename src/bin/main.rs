//! The `cpuload` binary: samples CPU utilization on a fixed interval and
//! prints each sample.

use std::{
    io::{self, Write},
    sync::{mpsc, Arc},
};

use anyhow::{Context, Result};
use clap::Parser;
use cpuload::{
    collection::cpu::{CounterSource, PlatformSource, UtilizationSample, UtilizationSampler},
    options::{args::Args, init_options, settings::ConfigStore, SamplingOptions},
};

fn main() -> Result<()> {
    let args = Args::parse();

    #[cfg(feature = "logging")]
    {
        if let Some(log_file) = &args.logging_args.log_file {
            let level = if args.logging_args.debug {
                log::LevelFilter::Debug
            } else {
                log::LevelFilter::Warn
            };

            cpuload::utils::logging::init_logger(level, std::path::Path::new(log_file))
                .context("Unable to set up logging to the given file.")?;
        }
    }

    let (store, options) = init_options(&args).context("Unable to set up the options.")?;
    let store = Arc::new(store);

    let sampler = UtilizationSampler::new(PlatformSource::new(), store.clone());

    // Ctrl-C just ends the loop so the sampler is dropped normally.
    let (stop_sender, stop_receiver) = mpsc::channel();
    ctrlc::set_handler(move || {
        let _ = stop_sender.send(());
    })
    .context("Unable to set the termination handler.")?;

    run(&sampler, &store, &options, &stop_receiver)
}

/// Samples once per tick until the sample count is reached or a stop is
/// received.
fn run<S: CounterSource>(
    sampler: &UtilizationSampler<S>, store: &ConfigStore, options: &SamplingOptions,
    stop: &mpsc::Receiver<()>,
) -> Result<()> {
    let mut stdout = io::stdout().lock();
    let mut taken = 0;

    loop {
        if let Some(sample) = sampler.sample() {
            print_sample(&mut stdout, &sample, options.json)?;
        }

        taken += 1;
        if options.count.is_some_and(|count| taken >= count) {
            break;
        }

        if let Err(err) = store.reload() {
            log::warn!("keeping previous settings: {err}");
        }

        match stop.recv_timeout(options.rate) {
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(())
}

fn print_sample(out: &mut impl Write, sample: &UtilizationSample, json: bool) -> Result<()> {
    if json {
        serde_json::to_writer(&mut *out, sample)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{sample}")?;
    }

    out.flush()?;
    Ok(())
}
