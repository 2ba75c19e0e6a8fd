use crate::diagram::{Diagram, Part};

pub fn build_enhance_prompt(initial: &Diagram, parts: &[Part]) -> String {
    let parts_text = summarize_parts(parts);
    let draft = initial
        .to_json_pretty()
        .unwrap_or_else(|_| "{}".to_string());

    format!(
        r#"You are an electronics engineer producing a Wokwi circuit diagram.

Components:
{}

A rule-based generator produced this draft:
{}

Improve the draft's electrical connections if needed. Requirements:
1. Keep the parts array exactly as in the draft (same ids, same count)
2. Use realistic wire colors (red=power, black=ground, other colors for signals)
3. Route wires with steps like ["v10", "h20", "*", "v-5"] for a clean layout
4. Never connect two wires to the same microcontroller GPIO
5. Every component must be connected

Return ONLY the complete JSON object with this exact structure:
{{
  "version": 1,
  "author": "{}",
  "editor": "wokwi",
  "parts": [...],
  "connections": [
    ["source_pin", "target_pin", "wire_color", ["wire_routing_path"]]
  ],
  "dependencies": {{}}
}}"#,
        parts_text, draft, initial.author
    )
}

fn summarize_parts(parts: &[Part]) -> String {
    if parts.is_empty() {
        return "None".to_string();
    }
    parts
        .iter()
        .map(|p| {
            format!(
                "- {}: {} at position (top: {}, left: {})",
                p.id, p.part_type, p.top, p.left
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_lists_parts_and_draft() {
        let parts = vec![
            Part::new("wokwi-arduino-uno", "mcu").at(200.0, 200.0),
            Part::new("wokwi-led", "led1").at(80.0, 350.0),
        ];
        let mut draft = Diagram::default();
        draft.parts = parts.clone();

        let prompt = build_enhance_prompt(&draft, &parts);
        assert!(prompt.contains("- mcu: wokwi-arduino-uno at position (top: 200, left: 200)"));
        assert!(prompt.contains("- led1: wokwi-led"));
        assert!(prompt.contains("\"editor\": \"wokwi\""));
        assert!(prompt.contains("\"dependencies\": {}"));
    }
}
