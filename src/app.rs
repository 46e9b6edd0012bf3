//! One run: location, satellite, prediction, layout, panel update.

use crate::catalog::{ask_norad, select_satellite};
use crate::client::{PassPrediction, PassPredictor};
use crate::config::Config;
use crate::display::{Frame, Panel};
use crate::format::PassSummary;
use crate::location::{resolve_location, Location};
use crate::prompt::Prompter;
use crate::render::{draw_layout, layout_lines, Layout, MonoFaces};
use crate::Error;

/// Fetch the next pass, asking for another NORAD ID each time the API
/// reports the current one as unknown.
///
/// Returns the identifier that finally succeeded along with its prediction.
pub fn fetch_next_pass<C, P>(
    predictor: &mut C,
    prompter: &mut P,
    norad: String,
    location: &Location,
) -> Result<(String, PassPrediction), Error>
where
    C: PassPredictor,
    P: Prompter,
{
    let mut norad = norad;
    loop {
        match predictor.next_pass(&norad, location) {
            Ok(pass) => return Ok((norad, pass)),
            Err(Error::NotFound { norad: missing }) => {
                tracing::warn!("NORAD ID {} not found", missing);
                prompter.say("NORAD ID doesn't exist.\n")?;
                norad = ask_norad(prompter)?;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Lay out a pass summary for a panel `width` pixels wide and draw it.
pub fn render_pass(summary: &PassSummary, width: u32, frame: &mut Frame) -> Layout {
    let lines = summary.lines();
    let layout = layout_lines(&MonoFaces, &lines, width);
    draw_layout(&layout, frame);
    tracing::debug!(
        "Layout uses {}x{} of {}x{}",
        layout.extent,
        layout.height(),
        frame.width(),
        frame.height()
    );
    layout
}

/// Everything a run needs besides configuration.
pub struct App<'a, C, P, D> {
    config: &'a Config,
    predictor: C,
    prompter: P,
    panel: D,
}

impl<'a, C, P, D> App<'a, C, P, D>
where
    C: PassPredictor,
    P: Prompter,
    D: Panel,
{
    pub fn new(config: &'a Config, predictor: C, prompter: P, panel: D) -> Self {
        Self {
            config,
            predictor,
            prompter,
            panel,
        }
    }

    /// Run once. With `norad` set, the satellite menu is skipped.
    pub fn run(&mut self, norad: Option<String>) -> Result<Layout, Error> {
        let location = resolve_location(
            &self.config.location,
            &self.config.timezone,
            &mut self.prompter,
        )?;

        let norad = match norad {
            Some(id) => id,
            None => select_satellite(&mut self.prompter, self.config.prompt.validate_names)?,
        };

        let (norad, pass) =
            fetch_next_pass(&mut self.predictor, &mut self.prompter, norad, &location)?;
        tracing::info!("Next pass of {} (NORAD {}) starts {}", pass.name, norad, pass.start);

        let summary = PassSummary::from_prediction(&pass, location.timezone)?;

        let size = self.panel.size();
        let mut frame = Frame::new(size.width, size.height, self.config.display.ink);
        let layout = render_pass(&summary, size.width, &mut frame);

        self.panel.show(&frame)?;
        Ok(layout)
    }

    /// Consume the app, returning its parts (useful for inspecting test doubles).
    pub fn into_parts(self) -> (C, P, D) {
        (self.predictor, self.prompter, self.panel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::Console;
    use embedded_graphics::prelude::Size;
    use std::io::Cursor;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn so50() -> PassPrediction {
        PassPrediction {
            name: "SO-50".to_string(),
            start: "2019-03-01T18:00:00.000Z".to_string(),
            tca: "2019-03-01T18:05:00.000Z".to_string(),
            end: "2019-03-01T18:10:00.000Z".to_string(),
            aosazimuth: 45.into(),
            maxel: 60.into(),
            losazimuth: 135.into(),
        }
    }

    /// Answers from a fixed list of known IDs, recording every request.
    struct FakePredictor {
        known: Vec<&'static str>,
        requests: Vec<(String, Location)>,
    }

    impl PassPredictor for FakePredictor {
        fn next_pass(&mut self, norad: &str, location: &Location) -> Result<PassPrediction, Error> {
            self.requests.push((norad.to_string(), location.clone()));
            if self.known.iter().any(|k| *k == norad) {
                Ok(so50())
            } else {
                Err(Error::NotFound {
                    norad: norad.to_string(),
                })
            }
        }
    }

    struct Unreachable;

    impl PassPredictor for Unreachable {
        fn next_pass(&mut self, _: &str, _: &Location) -> Result<PassPrediction, Error> {
            Err(Error::Unreachable("connection refused".to_string()))
        }
    }

    #[derive(Default)]
    struct MemoryPanel {
        frames: Vec<Frame>,
    }

    impl Panel for MemoryPanel {
        fn size(&self) -> Size {
            Size::new(212, 104)
        }

        fn show(&mut self, frame: &Frame) -> Result<(), Error> {
            self.frames.push(frame.clone());
            Ok(())
        }
    }

    fn predictor(known: &[&'static str]) -> FakePredictor {
        FakePredictor {
            known: known.to_vec(),
            requests: Vec::new(),
        }
    }

    #[test]
    fn test_not_found_reprompts_once_per_404() {
        let location = Location::new("29.27371", "-95.35739", "0", chrono_tz::US::Central);
        let mut p = predictor(&["27607"]);
        let mut c = console("11111\n27607\n");

        let (norad, pass) = fetch_next_pass(&mut p, &mut c, "99999".into(), &location).unwrap();
        assert_eq!(norad, "27607");
        assert_eq!(pass.name, "SO-50");

        let asked: Vec<_> = p.requests.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(asked, ["99999", "11111", "27607"]);

        let out = String::from_utf8(c.into_writer()).unwrap();
        assert_eq!(out.matches("NORAD ID doesn't exist.").count(), 2);
        assert_eq!(out.matches("Please enter a 5-digit NORAD ID").count(), 2);
    }

    #[test]
    fn test_unreachable_is_not_retried() {
        let location = Location::new("29.27371", "-95.35739", "0", chrono_tz::UTC);
        let mut c = console("27607\n");
        let err = fetch_next_pass(&mut Unreachable, &mut c, "27607".into(), &location).unwrap_err();
        assert!(err.is_unreachable());
        assert!(c.into_writer().is_empty());
    }

    #[test]
    fn test_so50_end_to_end() {
        let config = Config::default();
        let mut app = App::new(
            &config,
            predictor(&["27607"]),
            console("1\nSO-50\n"),
            MemoryPanel::default(),
        );

        let layout = app.run(None).unwrap();
        let (p, _, panel) = app.into_parts();

        let (norad, location) = &p.requests[0];
        assert_eq!(norad, "27607");
        assert_eq!(location.latitude, "29.27371");
        assert_eq!(location.longitude, "-95.35739");
        assert_eq!(location.altitude, "0");

        let texts: Vec<_> = layout.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(
            texts,
            [
                "SO-50",
                "AOS:  12:00:00 @ 45°",
                "Peak: 12:05:00 @ 60°E",
                "LOS:  12:10:00 @ 135°",
                "Pass: 0:10:00",
            ]
        );

        // Longest line is 21 chars, 210px with the 10px face
        let sizes: Vec<_> = layout.lines.iter().map(|l| l.font_size).collect();
        assert_eq!(sizes, [20, 20, 20, 20, 20]);
        assert_eq!(layout.extent, 210);

        let mut top = 0;
        for line in &layout.lines {
            assert_eq!(line.top, top);
            assert!(line.width <= 212);
            top += line.height + 1;
        }

        assert_eq!(panel.frames.len(), 1);
        assert!(panel.frames[0].inked_count() > 0);
    }

    #[test]
    fn test_norad_override_skips_menu() {
        let config = Config::default();
        let mut app = App::new(
            &config,
            predictor(&["43700"]),
            console(""),
            MemoryPanel::default(),
        );
        app.run(Some("43700".to_string())).unwrap();
    }

    #[test]
    fn test_invalid_menu_action_stops_before_request() {
        let config = Config::default();
        let mut app = App::new(
            &config,
            predictor(&["27607"]),
            console("9\n"),
            MemoryPanel::default(),
        );
        assert!(matches!(app.run(None), Err(Error::InvalidAction(_))));

        let (p, _, panel) = app.into_parts();
        assert!(p.requests.is_empty());
        assert!(panel.frames.is_empty());
    }
}
