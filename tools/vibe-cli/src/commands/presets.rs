//! List filter presets.

use vibe_render_engine::presets::{FilterPreset, AUDIO_PRESETS, VIDEO_PRESETS};

pub fn run() -> anyhow::Result<()> {
    print_table("Video presets", VIDEO_PRESETS);
    println!();
    print_table("Audio presets", AUDIO_PRESETS);
    Ok(())
}

fn print_table(title: &str, presets: &[FilterPreset]) {
    println!("{title}");
    println!("{}", "-".repeat(50));
    for preset in presets {
        println!("  {:<16} {:<20} {}", preset.id, preset.name, preset.expression);
    }
}
