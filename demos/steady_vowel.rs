//! Renders a steady /a/-like vowel from a single cascade-branch frame and
//! writes it out as a raw 64-bit float PCM file.

use std::fs::File;
use std::io::{BufWriter, Write};

use klatt_cascade::{CascadeParams, FrameParams, GlottalSourceKind, MainParams, generate_sound};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let main = MainParams::new(44100, GlottalSourceKind::Impulsive)?;

    let frame = FrameParams::new(1.0, 120.0)
        .with_open_phase_ratio(0.7)
        .with_flutter_level(0.25)
        .with_breathiness_db(-25.0)
        .with_oral_formants(&[
            (730.0, 90.0),
            (1090.0, 110.0),
            (2440.0, 170.0),
            (3400.0, 250.0),
            (4300.0, 300.0),
            (5200.0, 350.0),
        ])
        .with_cascade(CascadeParams {
            enabled: true,
            voicing_db: 0.0,
            aspiration_db: -25.0,
            aspiration_mod: 0.5,
            ..Default::default()
        });

    let samples = generate_sound(main, &[frame])?;
    log::info!("rendered {} samples at {} Hz", samples.len(), main.sample_rate);

    let file = File::create("steady_vowel.f64")?;
    let mut writer = BufWriter::new(file);
    for sample in &samples {
        writer.write_all(&sample.to_le_bytes())?;
    }

    Ok(())
}
