//! The map pane: world basemap plus the zoom-dependent mood layers.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  symbols::Marker,
  text::Span,
  widgets::{
    Block, Borders,
    canvas::{Canvas, Map, MapResolution},
  },
};

use crate::{
  app::App,
  layers::{self, Layer},
};

/// Render the map into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let camera = app.camera;
  let block = Block::default()
    .title(format!(
      " {:.2}, {:.2} ",
      camera.center.lat, camera.center.lon
    ))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  // One heat cell per terminal cell inside the border.
  let inner = block.inner(area);
  let features = &app.source.features;
  let heat = layers::heat_cells(features, &camera, inner.width, inner.height);
  let visible = layers::visible_layers(camera.zoom);

  let canvas = Canvas::default()
    .block(block)
    .marker(Marker::Braille)
    .x_bounds(camera.x_bounds())
    .y_bounds(camera.y_bounds())
    .paint(|ctx| {
      ctx.draw(&Map {
        color:      Color::DarkGray,
        resolution: MapResolution::High,
      });

      for layer in &visible {
        ctx.layer();
        match layer {
          Layer::Heatmap => {
            for cell in &heat {
              ctx.print(
                cell.lon,
                cell.lat,
                Span::styled(
                  layers::heat_glyph(cell.weight),
                  Style::default().fg(layers::heat_color(cell.weight)),
                ),
              );
            }
          }
          Layer::Points => {
            for feature in features.iter().filter(|feat| camera.contains(feat.geometry)) {
              ctx.print(
                feature.geometry.lon,
                feature.geometry.lat,
                Span::styled(
                  "●",
                  Style::default().fg(layers::rating_color(feature.properties.name)),
                ),
              );
            }
          }
        }
      }

      if let Some(p) = app.location {
        ctx.layer();
        ctx.print(
          p.lon,
          p.lat,
          Span::styled(
            "◎",
            Style::default()
              .fg(Color::Cyan)
              .add_modifier(Modifier::BOLD),
          ),
        );
      }
    });

  f.render_widget(canvas, area);
}
