use macroquad::prelude::*;
use macroquad_tmx::{MapLoader, RenderState};

// ❶ Override the default 800 × 450 pixels here
fn window_conf() -> Conf {
    Conf {
        window_title: "Basic TMX Map".into(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // usage: cargo run --example basic_map -- assets/ level.tmx
    let mut args = std::env::args().skip(1);
    let dir = args.next().unwrap_or_else(|| "assets/".to_owned());
    let file = args.next().unwrap_or_else(|| "map.tmx".to_owned());

    let mut loader = MapLoader::with_base_path(dir.clone());
    loader.add_search_path(dir);
    let map = loader.parse_file(&file).expect("Failed to load map");

    let mut state = RenderState::default();

    loop {
        clear_background(BLACK);

        let speed = 240.0 * get_frame_time();
        if is_key_down(KeyCode::Left) {
            state.offset.x += speed;
        }
        if is_key_down(KeyCode::Right) {
            state.offset.x -= speed;
        }
        if is_key_down(KeyCode::Up) {
            state.offset.y += speed;
        }
        if is_key_down(KeyCode::Down) {
            state.offset.y -= speed;
        }

        loader.draw(&map, &state);

        // Draw the frame rate in the top-right corner
        draw_text(
            &format!("FPS: {}", get_fps()),
            screen_width() - 135.0,
            55.0,
            30.0,
            RED,
        );

        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        next_frame().await;
    }
}
