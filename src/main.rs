use anyhow::Result;
use heart_risk::input::{CHEST_PAIN_LABELS, SEX_LABELS};
use heart_risk::{HeartDiseasePredictor, PatientForm, PipelineConfig, PredictError, RiskLevel};
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("heart_risk=info")),
        )
        .init();

    println!("🧠 Training model...");
    let predictor =
        HeartDiseasePredictor::train(Path::new("heart.csv"), &PipelineConfig::default())?;
    if let Some(acc) = predictor.report().test_accuracy {
        println!("✅ Test accuracy: {:.2}%", acc * 100.0);
    }

    let sex_prompt = format!("🚻 Cinsiyet ({}): ", SEX_LABELS.join("/"));
    let chest_pain_prompt = format!(
        "💢 Göğüs Ağrısı Tipi ({}): ",
        CHEST_PAIN_LABELS.join("/")
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        println!("\n🫀 Heart disease risk (type 'exit' to quit)");
        let Some(age) = prompt(&mut lines, "👤 Yaş: ")? else {
            break;
        };
        let Some(sex) = prompt(&mut lines, &sex_prompt)? else {
            break;
        };
        let Some(chest_pain) = prompt(&mut lines, &chest_pain_prompt)? else {
            break;
        };
        let Some(resting_bp) = prompt(&mut lines, "🩸 Dinlenme Kan Basıncı: ")? else {
            break;
        };
        let Some(cholesterol) = prompt(&mut lines, "🧪 Kolesterol: ")? else {
            break;
        };

        let form = PatientForm::new(age, sex, chest_pain, resting_bp, cholesterol);
        match predictor.predict(&form) {
            Ok(verdict) => {
                let marker = match verdict.risk {
                    RiskLevel::High => "🔴",
                    RiskLevel::Low => "🟢",
                };
                println!("\n🔍 Tahmin Sonucu: {marker}\n\n{verdict}");
                println!("\nNot: Bu sonuçlar tahmini değerlerdir.");
                println!("Kesin teşhis için doktorunuza danışınız.");
            }
            Err(PredictError::InputFormat { .. }) => {
                println!("❌ Hata: Lütfen tüm alanları doğru formatta doldurun!");
            }
            Err(e) => println!("❌ Hata: Bir hata oluştu: {e}"),
        }
    }

    Ok(())
}

/// Reads one answer. `None` on end of input or when the user types `exit`.
fn prompt<B: BufRead>(lines: &mut io::Lines<B>, label: &str) -> Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;
    let Some(line) = lines.next().transpose()? else {
        return Ok(None);
    };
    let line = line.trim().to_owned();
    if line.eq_ignore_ascii_case("exit") {
        return Ok(None);
    }
    Ok(Some(line))
}
