//! 环岛交通仿真
//!
//! 构建多车道环岛，启动所有入口生成器并运行到给定时刻。

use clap::Parser;
use roundabout_sim::sim::{ActivationDelay, SimConfig};
use roundabout_sim::traffic::Roundabout;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "roundabout", about = "多车道环岛交通仿真（离散事件）")]
struct Args {
    /// JSON 配置文件；下面的参数会覆盖其中的同名字段
    #[arg(long)]
    config: Option<PathBuf>,

    /// 最外圈半径（车道圈数）
    #[arg(long)]
    lane_count: Option<u32>,

    /// 每圈 slot 数
    #[arg(long)]
    angular_resolution: Option<u32>,

    #[arg(long)]
    speed_limit: Option<f64>,

    /// 相邻出入口之间相隔的 slot 数
    #[arg(long)]
    entrance_spacing: Option<u32>,

    /// 最内圈半径（中心岛）
    #[arg(long)]
    start_radius: Option<u32>,

    /// 假定的最小车距
    #[arg(long)]
    car_spacing: Option<f64>,

    #[arg(long)]
    spawn_probability: Option<f64>,

    #[arg(long)]
    move_probability: Option<f64>,

    /// 车辆唤醒间隔（时间单位）；与 --dwell 互斥
    #[arg(long, conflicts_with = "dwell")]
    activation_interval: Option<f64>,

    /// 车辆唤醒间隔服从均值为节点 exit_time 的指数分布
    #[arg(long)]
    dwell: bool,

    /// 仿真运行到多少时间单位
    #[arg(long)]
    horizon: Option<f64>,

    #[arg(long)]
    seed: Option<u64>,

    /// 占用快照采样间隔（时间单位）
    #[arg(long)]
    snapshot_interval: Option<f64>,

    /// 输出可视化 JSON 事件文件；不填则不生成
    #[arg(long)]
    viz_json: Option<PathBuf>,

    /// 不打印日志
    #[arg(long)]
    quiet: bool,
}

impl Args {
    fn resolve(&self) -> Result<SimConfig, String> {
        let mut cfg = match &self.config {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .map_err(|e| format!("read {}: {e}", path.display()))?;
                serde_json::from_str(&raw).map_err(|e| format!("parse {}: {e}", path.display()))?
            }
            None => SimConfig::default(),
        };

        let topo = &mut cfg.topology;
        if let Some(v) = self.lane_count {
            topo.lane_count = v;
        }
        if let Some(v) = self.angular_resolution {
            topo.angular_resolution = v;
        }
        if let Some(v) = self.speed_limit {
            topo.speed_limit = v;
        }
        if let Some(v) = self.entrance_spacing {
            topo.entrance_spacing = v;
        }
        if let Some(v) = self.start_radius {
            topo.start_radius = v;
        }
        if let Some(v) = self.car_spacing {
            topo.car_spacing = v;
        }

        let traffic = &mut cfg.traffic;
        if let Some(v) = self.spawn_probability {
            traffic.spawn_probability = v;
        }
        if let Some(v) = self.move_probability {
            traffic.move_probability = v;
        }
        if let Some(every) = self.activation_interval {
            traffic.activation = ActivationDelay::Fixed { every };
        }
        if self.dwell {
            traffic.activation = ActivationDelay::Dwell;
        }

        if let Some(v) = self.horizon {
            cfg.simulation_horizon = v;
        }
        if let Some(v) = self.seed {
            cfg.random_seed = v;
        }
        if let Some(v) = self.snapshot_interval {
            cfg.snapshot_interval = Some(v);
        }
        Ok(cfg)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(if args.quiet {
            tracing_subscriber::EnvFilter::new("off")
        } else {
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
        })
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let cfg = match args.resolve() {
        Ok(cfg) => cfg,
        Err(msg) => {
            eprintln!("error: {msg}");
            return ExitCode::FAILURE;
        }
    };

    let mut sim = match Roundabout::new(cfg) {
        Ok(sim) => sim,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    if args.viz_json.is_some() {
        sim.enable_viz();
    }

    let summary = match sim.run() {
        Ok(summary) => summary,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    println!(
        "done @ {}, events={}, spawned={}, exited={}, moves={}, blocked={}, hesitations={}, traveling={}",
        summary.now,
        summary.events,
        summary.stats.spawned_cars,
        summary.stats.exited_cars,
        summary.stats.moves,
        summary.stats.blocked_moves,
        summary.stats.hesitations,
        summary.stats.traveling(),
    );

    if let Some(path) = args.viz_json {
        if let Some(v) = sim.take_viz() {
            let json = match v.to_json_pretty() {
                Ok(json) => json,
                Err(err) => {
                    eprintln!("error: serialize viz events: {err}");
                    return ExitCode::FAILURE;
                }
            };
            if let Err(err) = fs::write(&path, json) {
                eprintln!("error: write {}: {err}", path.display());
                return ExitCode::FAILURE;
            }
            if !args.quiet {
                eprintln!("wrote viz events to {}", path.display());
            }
        }
    }

    ExitCode::SUCCESS
}
