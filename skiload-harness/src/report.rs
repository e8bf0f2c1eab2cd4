use skiload_common::Result;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::controller::RunReport;
use crate::sample::LatencySample;
use crate::stats::{AggregateStatistics, SampleSnapshot};

pub const CSV_HEADER: &str = "RequestMethod,ResponseCode,StartTimeStamp,EndTimeStamp,Latency";

/// Write every sample to `path` as CSV: writes first, then reads.
pub fn write_csv(path: &Path, samples: &SampleSnapshot) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_csv_to(&mut out, samples)?;
    out.flush()?;
    Ok(())
}

pub fn write_csv_to(out: &mut impl Write, samples: &SampleSnapshot) -> Result<()> {
    writeln!(out, "{CSV_HEADER}")?;
    for sample in samples.writes.iter().chain(&samples.reads) {
        writeln!(out, "{}", csv_line(sample))?;
    }
    Ok(())
}

fn csv_line(sample: &LatencySample) -> String {
    format!(
        "{},{},{},{},{}",
        sample.class().method(),
        sample.status(),
        sample.start_ms(),
        sample.end_ms(),
        sample.latency_ms()
    )
}

/// Render the console summary of a run.
pub fn format_summary(report: &RunReport, max_concurrency: u32) -> String {
    let mut s = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(s, "SkiLoad Results");
    let _ = writeln!(s, "===============");
    let _ = writeln!(s, "Max concurrency:       {}", max_concurrency);
    let _ = writeln!(s, "Successful requests:   {}", report.counts.success);
    let _ = writeln!(s, "Failed requests:       {}", report.counts.failure);
    let _ = writeln!(s, "Wall time:             {:.3} s", report.wall_time.as_secs_f64());
    let _ = writeln!(s, "Throughput:            {:.1} req/s", report.throughput_rps());

    if let Some(stats) = &report.statistics {
        let _ = writeln!(s);
        write_class(&mut s, "POST", stats.write.as_ref());
        write_class(&mut s, "GET", stats.read.as_ref());
    }
    s
}

fn write_class(s: &mut String, method: &str, stats: Option<&AggregateStatistics>) {
    match stats {
        Some(st) => {
            let _ = writeln!(s, "Mean {method:<4} latency:     {:.1} ms", st.mean);
            let _ = writeln!(s, "Median {method:<4} latency:   {:.1} ms", st.median);
            let _ = writeln!(s, "Max {method:<4} latency:      {} ms", st.max);
            let _ = writeln!(s, "P99 {method:<4} latency:      {} ms", st.p99);
        }
        None => {
            let _ = writeln!(s, "{method:<4} latency:          n/a (no samples)");
        }
    }
}

pub fn print_summary(report: &RunReport, max_concurrency: u32) {
    print!("{}", format_summary(report, max_concurrency));
}
