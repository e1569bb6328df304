//! 로깅 시스템 사용 예제
//!
//! 실행: RUST_LOG=debug cargo run --example logging --features logging

use kiln_core::automation::CreateJobStatement;
use kiln_core::{Engine, EngineConfig};

fn main() -> kiln_core::KilnResult<()> {
    let config = EngineConfig::from_env()?;

    // 로깅 초기화 (RUST_LOG가 없으면 KILN_LOG_LEVEL)
    kiln_core::logging::init_from_config(&config);

    println!("=== Kiln 로깅 예제 ===\n");
    let engine = Engine::open(config)?;

    println!("작업 생성 중...");
    let result = engine.create_job(&CreateJobStatement {
        job_name: "job1".to_string(),
        queries: vec!["SELECT HomeSalesForecast(10);".to_string()],
        start_time: "2023-04-01 01:10:00".to_string(),
        end_time: Some("2023-05-01".to_string()),
        repeat_interval: 2,
        repeat_period: "week".to_string(),
        if_not_exists: true,
    })?;
    println!("{result:?}");

    engine.close()?;
    println!("\n주의: logging feature가 활성화되어야 로그가 출력됩니다.");
    Ok(())
}
