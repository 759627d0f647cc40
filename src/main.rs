//! Health SMS Probe 主程序入口
//!
//! 由外部调度器（cron、systemd timer 等）触发，每次运行执行一次检测

use anyhow::Result;
use health_sms_probe::cli::{format_report, parse_args, run_probe};
use health_sms_probe::logging;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 参数错误已输出到终端，不发送短信
    let Some(args) = parse_args(std::env::args_os()) else {
        return Ok(());
    };

    // 日志初始化失败不影响检测本身
    if let Err(e) = logging::init(&args.log_config()) {
        eprintln!("{e:#}");
    }

    info!("Health SMS Probe v{} 启动", health_sms_probe::VERSION);

    if let Some(report) = run_probe(&args).await {
        match format_report(&report, &args.output) {
            Ok(Some(rendered)) => println!("{rendered}"),
            Ok(None) => {}
            Err(e) => error!("输出检测报告失败: {}", e),
        }
    }

    // 无论检测结果如何都正常退出
    Ok(())
}
