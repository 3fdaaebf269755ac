use super::types::LayoutNode;

/// Right-angled connector between a parent and one of its children: a
/// depth-axis move to the bend, then a lateral move. The move order is
/// fixed (depth first, then lateral), so the elbow always bends at the
/// source's lateral position.
///
/// When leaf alignment pulled the target to the shared far edge
/// (`target.y != target.y_free`), the bend is routed through the source's
/// unaligned depth coordinate and a final depth-axis segment drops to the
/// aligned position. Bending at the aligned coordinate instead would run
/// the lateral segment across sibling subtrees.
pub fn elbow_path(source: &LayoutNode, target: &LayoutNode) -> Vec<(f32, f32)> {
    let start = (source.x, source.y);
    let end = (target.x, target.y);

    let bend_y = if target.y == target.y_free {
        target.y
    } else {
        source.y_free.max(source.y)
    };

    let mut points = vec![start, (source.x, bend_y), (target.x, bend_y), end];
    points.dedup_by(|a, b| a.0 == b.0 && a.1 == b.1);
    points
}
