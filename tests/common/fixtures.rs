use trialsheet::{Color, Rect, ViewNode, ViewTree};

pub const STUDY_URL: &str = "https://clinicaltrials.gov/study/NCT06189391";
pub const SPONSOR_URL: &str = "https://example.org/sponsor";
pub const LINK_BLUE: Color = Color { r: 0x1a, g: 0x73, b: 0xe8, a: 1.0 };
pub const LINK_GREEN: Color = Color { r: 0x0b, g: 0x80, b: 0x43, a: 1.0 };

/// An 800x600 card scrolled 200 units down, sitting at viewport (100, 50).
///
/// `link1` covers root-relative (40, 500, 100, 30), `link2` has only a `dataHref`,
/// and `link3` is absent.
pub fn trial_card() -> ViewTree {
    ViewTree::new(
        ViewNode::new(Rect::new(100.0, 250.0, 800.0, 600.0))
            .with_background(Color::WHITE)
            .with_border(Color::gray(0xdd), 1.0)
            .with_child(
                ViewNode::new(Rect::new(132.0, 282.0, 736.0, 48.0)).with_background(Color::gray(0x22)),
            )
            .with_child(
                ViewNode::new(Rect::new(140.0, 750.0, 100.0, 30.0))
                    .with_id("link1")
                    .with_background(LINK_BLUE)
                    .with_href(STUDY_URL),
            )
            .with_child(
                ViewNode::new(Rect::new(600.0, 750.0, 120.0, 30.0))
                    .with_id("link2")
                    .with_background(LINK_GREEN)
                    .with_data_href(SPONSOR_URL),
            ),
    )
    .with_scroll_y(200.0)
}

/// The trial card with `link2`'s URL removed.
pub fn card_with_unresolvable_link() -> ViewTree {
    let mut tree = trial_card();
    for child in &mut tree.root.children {
        if child.id.as_deref() == Some("link2") {
            child.data_href = Some(String::new());
            child.href = None;
        }
    }
    tree
}

/// A card with a single link marker carrying both `href` and `dataHref`.
pub fn card_with_data_href_override() -> ViewTree {
    ViewTree::new(
        ViewNode::new(Rect::new(0.0, 0.0, 400.0, 300.0)).with_background(Color::WHITE).with_child(
            ViewNode::new(Rect::new(20.0, 20.0, 80.0, 20.0))
                .with_id("link1")
                .with_href("https://example.org/fallback")
                .with_data_href("https://example.org/preferred"),
        ),
    )
}

pub fn zero_size_view() -> ViewTree {
    ViewTree::new(ViewNode::new(Rect::new(10.0, 10.0, 0.0, 0.0)))
}
