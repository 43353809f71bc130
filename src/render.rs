use crate::layer::Layer;
use crate::types::Bounds;

const MAX_WIDTH: f64 = 80.0;
const MAX_HEIGHT: f64 = 40.0;

/// ASCII view of one layer seen from above, scaled to fit 80x40 characters.
/// Each item is boxed and labelled with its id when there is room.
pub fn render_layer(bounds: Bounds, layer: &Layer) -> String {
    let scale = f64::min(
        MAX_WIDTH / bounds.max_x as f64,
        MAX_HEIGHT / bounds.max_y as f64,
    );
    let grid_w = (bounds.max_x as f64 * scale).round() as usize;
    let grid_h = (bounds.max_y as f64 * scale).round() as usize;

    if grid_w == 0 || grid_h == 0 {
        return String::new();
    }

    let mut grid = vec![vec![' '; grid_w + 1]; grid_h + 1];

    draw_rect(&mut grid, 0, 0, grid_w, grid_h);

    for item in layer.items() {
        // cells are 1-based and inclusive
        let sx = ((item.x1() - 1) as f64 * scale).round() as usize;
        let sy = ((item.y1() - 1) as f64 * scale).round() as usize;
        let sw = (item.width() as f64 * scale).round() as usize;
        let sh = (item.length() as f64 * scale).round() as usize;

        if sw == 0 || sh == 0 {
            continue;
        }

        draw_rect(&mut grid, sx, sy, sw, sh);

        let label: Vec<char> = item.id.to_string().chars().collect();
        if sw > 2 && sh > 0 {
            let cx = sx + sw / 2;
            let cy = sy + sh / 2;
            let start_x = cx.saturating_sub(label.len() / 2);

            for (i, &ch) in label.iter().enumerate() {
                let x = start_x + i;
                if x > sx && x < sx + sw && cy > sy && cy < sy + sh {
                    grid[cy][x] = ch;
                }
            }
        }
    }

    let mut result = String::new();
    for row in &grid {
        let line: String = row.iter().collect();
        result.push_str(line.trim_end());
        result.push('\n');
    }
    result
}

fn edge(current: char, crossing: char, own: char) -> char {
    if current == crossing || current == '+' { '+' } else { own }
}

fn draw_rect(grid: &mut [Vec<char>], x: usize, y: usize, w: usize, h: usize) {
    let rows = grid.len();
    let cols = if rows > 0 { grid[0].len() } else { return };

    for i in (x..=x + w).filter(|&i| i < cols) {
        for j in [y, y + h] {
            if j < rows {
                grid[j][i] = edge(grid[j][i], '|', '-');
            }
        }
    }

    for j in (y..=y + h).filter(|&j| j < rows) {
        for i in [x, x + w] {
            if i < cols {
                grid[j][i] = edge(grid[j][i], '-', '|');
            }
        }
    }

    for cx in [x, x + w] {
        for cy in [y, y + h] {
            if cy < rows && cx < cols {
                grid[cy][cx] = '+';
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::Placer;
    use crate::maxrects::MaxRectsLayer;
    use crate::types::Item;

    #[test]
    fn test_render_single_item() {
        let bounds = Bounds::new(100, 50);
        let mut layer = MaxRectsLayer::new(bounds, 1);
        layer.place(Item::new(42, 100, 50, 1));
        let output = render_layer(bounds, layer.layer());
        assert!(output.contains('+'));
        assert!(output.contains('-'));
        assert!(output.contains('|'));
        assert!(output.contains("42"));
    }

    #[test]
    fn test_render_two_items() {
        let bounds = Bounds::new(100, 100);
        let mut layer = MaxRectsLayer::new(bounds, 1);
        layer.place(Item::new(7, 50, 100, 1));
        layer.place(Item::new(8, 50, 100, 1));
        let output = render_layer(bounds, layer.layer());
        assert!(output.contains('7'));
        assert!(output.contains('8'));
        assert_eq!(output.lines().count(), 41);
    }

    #[test]
    fn test_render_position_is_one_based() {
        // 100x100 at scale 0.4: x1 = 51 starts at column 20, y1 = 61 at row 24.
        let bounds = Bounds::new(100, 100);
        let mut layer = Layer::new(1);
        layer.insert(Item::new(9, 50, 40, 1).with_position(51, 61, 1));
        let output = render_layer(bounds, &layer);
        let rows: Vec<Vec<char>> = output.lines().map(|l| l.chars().collect()).collect();

        assert_eq!(rows[24][20], '+');
        assert_eq!(rows[24][19], ' ');
        assert_eq!(rows[23].get(20), Some(&' '));
        assert_eq!(rows[40][20], '+');
        assert_eq!(rows[30][20], '|');
        assert_eq!(rows[32][30], '9');
    }

    #[test]
    fn test_render_empty() {
        let output = render_layer(Bounds::new(100, 100), &Layer::new(1));
        // Still draws the container border
        assert!(output.contains('+'));
    }
}
