use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use healthbook_api::summarize_profile_str;
use healthbook_core::format_numeric;

#[derive(Parser, Debug)]
#[command(
    name = "healthbook-cli",
    about = "Tóm tắt hồ sơ sức khỏe học sinh từ payload JSON đã lưu."
)]
struct Args {
    /// Đường dẫn tới file JSON payload.
    #[arg(short, long)]
    input: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let data = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Không đọc được file {:?}", args.input))?;

    let snapshot = summarize_profile_str(&data)?;

    println!(
        "Học sinh: {}\nNhóm tình trạng: {}\nLoại vắc-xin: {}\nTổng mũi tiêm: {}",
        snapshot.student.full_name,
        snapshot.conditions.len(),
        snapshot.vaccinations.len(),
        snapshot.vaccination_history.len()
    );

    if let Some(growth) = &snapshot.growth {
        let bmi = growth
            .latest
            .bmi
            .map(format_numeric)
            .unwrap_or_else(|| "--".to_string());
        let status = growth
            .bmi_status
            .map(|status| format!("{status:?}"))
            .unwrap_or_else(|| "--".to_string());
        println!("BMI gần nhất: {bmi} ({status})");
    }

    Ok(())
}
