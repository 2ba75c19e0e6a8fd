//! Build a circuit one part at a time and describe each step.

use wiresmith::layout::describe_position;
use wiresmith::prelude::*;
use wiresmith::wiring::display_name;

fn main() -> Result<(), WiresmithError> {
    let parts = wiresmith::parse_parts(
        r#"[
            {"type": "wokwi-pushbutton", "id": "btn1"},
            {"type": "wokwi-led", "id": "led1"},
            {"type": "wokwi-buzzer", "id": "bz1"},
            {"type": "board-ssd1306", "id": "oled1"}
        ]"#,
    )?;

    let steps = wiresmith::progressive_steps(&parts, &SynthesisOptions::default());
    for (i, step) in steps.iter().enumerate() {
        let Some(diagram) = step.diagram() else {
            continue;
        };
        println!("STEP {}", i + 1);
        println!("{}", "-".repeat(50));
        for part in &diagram.parts {
            println!("   {} ({})", display_name(&part.part_type), part.id);
            println!("       Position: {}", describe_position(part));
        }
        println!("   {} connections", diagram.connections.len());
        println!();
    }

    Ok(())
}
