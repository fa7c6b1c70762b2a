//! OSC (Operating System Command) dispatch table.

use super::EngineEvent;

/// Dispatches one OSC sequence. `params` are the `;`-separated byte slices
/// vte hands back (the first is the numeric command).
pub fn dispatch(params: &[&[u8]], events: &mut Vec<EngineEvent>) {
    let Some(&command) = params.first() else { return };
    let Ok(command_str) = std::str::from_utf8(command) else { return };
    let Ok(command_num) = command_str.parse::<u32>() else { return };

    match command_num {
        0 | 1 | 2 => {
            if let Some(title) = params.get(1).and_then(|b| std::str::from_utf8(b).ok()) {
                events.push(EngineEvent::SetTitle(title.to_string()));
            }
        }
        4 => {
            let mut rest = params.iter().skip(1);
            while let (Some(index_bytes), Some(spec_bytes)) = (rest.next(), rest.next()) {
                let (Ok(index_str), Ok(spec)) = (
                    std::str::from_utf8(index_bytes),
                    std::str::from_utf8(spec_bytes),
                ) else {
                    continue;
                };
                if let Ok(index) = index_str.parse::<u8>() {
                    events.push(EngineEvent::SetPaletteColor { index, spec: spec.to_string() });
                }
            }
        }
        104 => {
            if params.len() == 1 {
                events.push(EngineEvent::ResetAllPaletteColors);
            }
            for index_bytes in params.iter().skip(1) {
                if let Ok(index) =
                    std::str::from_utf8(index_bytes).unwrap_or_default().parse::<u8>()
                {
                    events.push(EngineEvent::ResetPaletteColor(index));
                }
            }
        }
        _ => {
            tracing::debug!(command_num, "unhandled OSC command");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_title() {
        let mut events = Vec::new();
        dispatch(&[b"0", b"my title"], &mut events);
        assert!(matches!(&events[0], EngineEvent::SetTitle(t) if t == "my title"));
    }

    #[test]
    fn set_palette_color() {
        let mut events = Vec::new();
        dispatch(&[b"4", b"3", b"rgb:ff/00/00"], &mut events);
        assert!(matches!(
            &events[0],
            EngineEvent::SetPaletteColor { index: 3, spec } if spec == "rgb:ff/00/00"
        ));
    }

    #[test]
    fn reset_palette_color() {
        let mut events = Vec::new();
        dispatch(&[b"104", b"3"], &mut events);
        assert!(matches!(events[0], EngineEvent::ResetPaletteColor(3)));
    }

    #[test]
    fn unknown_command_is_discarded_not_fatal() {
        let mut events = Vec::new();
        dispatch(&[b"9999"], &mut events);
        assert!(events.is_empty());
    }
}
