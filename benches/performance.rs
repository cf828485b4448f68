//! Benchmarks for the text parsing and report formatting hot paths

use chrono::Utc;
use clap::Parser;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use wifi_network_tester::{
    cli::Cli,
    config::ConfigParser,
    inventory::{parse_network_database, parse_supplicant_config},
    models::{NetworkTestResult, ProbeStatistics, TestRunReport},
    output::{JsonFormatter, PlainFormatter, ReportFormatter},
    probe::parse_probe_output,
};

const PING_OUTPUT: &str = "\
PING 8.8.8.8 (8.8.8.8) 56(84) bytes of data.
64 bytes from 8.8.8.8: icmp_seq=1 ttl=117 time=14.2 ms
64 bytes from 8.8.8.8: icmp_seq=2 ttl=117 time=13.9 ms

--- 8.8.8.8 ping statistics ---
20 packets transmitted, 19 received, 5% packet loss, time 19027ms
rtt min/avg/max/mdev = 12.345/15.678/25.901/3.210 ms
";

const TOTAL_LOSS_OUTPUT: &str = "\
PING 8.8.8.8 (8.8.8.8) 56(84) bytes of data.

--- 8.8.8.8 ping statistics ---
20 packets transmitted, 0 received, 100% packet loss, time 19000ms
";

fn network_database(count: usize) -> String {
    (0..count)
        .map(|i| format!("{}|Network-{}|secret{}|WPA-PSK\n", i, i, i))
        .collect()
}

fn supplicant_config(count: usize) -> String {
    let mut content = String::from("ctrl_interface=DIR=/var/run/wpa_supplicant\nupdate_config=1\n\n");
    for i in 0..count {
        content.push_str(&format!("network={{\n\tssid=\"Network-{}\"\n\tpsk=\"secret{}\"\n}}\n\n", i, i));
    }
    content
}

fn sample_report(count: usize) -> TestRunReport {
    let results = (0..count)
        .map(|i| {
            let stats = ProbeStatistics {
                packets_sent: 20,
                packets_received: 20 - (i % 5) as u32,
                packet_loss_percent: (i % 5) as f64 * 5.0,
                rtt_min_ms: 10.0,
                rtt_avg_ms: 15.0,
                rtt_max_ms: 30.0,
                rtt_std_dev_ms: 3.0,
            };
            NetworkTestResult::measured(&format!("Network-{}", i), "8.8.8.8", 20, stats, 5.0, "192.168.1.23".into(), None)
        })
        .collect();
    TestRunReport::new("bench".into(), results, Utc::now())
}

fn benchmark_probe_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("probe_parsing");

    group.bench_function("healthy_output", |b| {
        b.iter(|| black_box(parse_probe_output(black_box(PING_OUTPUT))))
    });

    group.bench_function("total_loss_output", |b| {
        b.iter(|| black_box(parse_probe_output(black_box(TOTAL_LOSS_OUTPUT))))
    });

    group.finish();
}

fn benchmark_inventory_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("inventory_parsing");

    for size in [5usize, 50, 500] {
        let database = network_database(size);
        group.bench_with_input(BenchmarkId::new("network_database", size), &database, |b, content| {
            b.iter(|| black_box(parse_network_database(content)))
        });

        let supplicant = supplicant_config(size);
        group.bench_with_input(BenchmarkId::new("supplicant_config", size), &supplicant, |b, content| {
            b.iter(|| black_box(parse_supplicant_config(content)))
        });
    }

    group.finish();
}

fn benchmark_report_formatting(c: &mut Criterion) {
    let mut group = c.benchmark_group("report_formatting");
    let report = sample_report(20);
    let plain = PlainFormatter::default();
    let json = JsonFormatter::new(false);

    group.bench_function("plain_summary", |b| {
        b.iter(|| black_box(plain.format_summary(black_box(&report))))
    });

    group.bench_function("plain_failure_alert", |b| {
        b.iter(|| black_box(plain.format_failure_alert(black_box(&report), Some("4242"))))
    });

    group.bench_function("json_summary", |b| {
        b.iter(|| black_box(json.format_summary(black_box(&report))))
    });

    group.finish();
}

fn benchmark_config_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("config_parsing");
    let args = ["wnt", "--count", "10", "--target", "1.1.1.1", "--no-color"];

    group.bench_function("parse_cli_args", |b| {
        b.iter(|| black_box(Cli::try_parse_from(black_box(args))))
    });

    group.bench_function("parse_from_cli", |b| {
        b.iter(|| {
            if let Ok(cli) = Cli::try_parse_from(args) {
                black_box(ConfigParser::new(cli).parse().ok());
            }
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_probe_parsing,
    benchmark_inventory_parsing,
    benchmark_report_formatting,
    benchmark_config_parsing
);
criterion_main!(benches);
