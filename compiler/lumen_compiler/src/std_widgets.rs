//! The `std-widgets.lumen` library.
//!
//! The widgets are ordinary components written in the component language.
//! Their source is generated for the selected style, so importing them
//! picks up that style's palette.

use std::fmt::Write;

use crate::style::Style;

/// Import path of the standard widget library.
pub const STD_WIDGETS_PATH: &str = "std-widgets.lumen";

/// Exported widget names.
pub const STD_WIDGETS: &[&str] = &["Button", "CheckBox", "LineEdit", "Slider"];

/// Source of the widget library for `style`.
pub fn source(style: Style) -> String {
    let palette = style.palette();
    let mut out = String::new();
    let _ = write!(
        out,
        r#"// Generated for style {style}.

export component Button inherits Rectangle {{
    in property <string> text;
    in property <bool> enabled: true;
    out property <bool> pressed: touch.pressed;
    callback clicked;

    height: 32px;
    border-radius: {radius}px;
    background: touch.pressed ? {accent_pressed} : {accent};

    touch := TouchArea {{
        enabled: root.enabled;
        width: root.width;
        height: root.height;
        clicked => {{ root.clicked(); }}
    }}
    Text {{
        text: root.text;
        color: {on_accent};
    }}
}}

export component CheckBox inherits Rectangle {{
    in-out property <bool> checked;
    in property <string> text;
    in property <bool> enabled: true;
    callback toggled;

    height: 24px;
    border-width: 1px;
    border-color: {border};
    border-radius: {radius}px;
    background: root.checked ? {accent} : {background};

    TouchArea {{
        enabled: root.enabled;
        width: root.width;
        height: root.height;
        clicked => {{
            root.checked = !root.checked;
            root.toggled();
        }}
    }}
    Text {{
        x: 28px;
        text: root.text;
        color: {foreground};
    }}
}}

export component LineEdit inherits Rectangle {{
    in-out property <string> text;
    in property <string> placeholder-text;
    in property <bool> enabled: true;
    callback accepted(string);

    height: 32px;
    border-width: 1px;
    border-color: {border};
    border-radius: {radius}px;
    background: {background};

    Text {{
        text: root.text == "" ? root.placeholder-text : root.text;
        color: {foreground};
    }}
}}

export component Slider inherits Rectangle {{
    in-out property <float> value;
    in property <float> minimum: 0;
    in property <float> maximum: 100;
    callback changed(float);

    height: 24px;
    background: {border};
    border-radius: 2px;

    Rectangle {{
        height: root.height;
        width: root.maximum > root.minimum
            ? root.width * ((root.value - root.minimum) / (root.maximum - root.minimum))
            : 0px;
        background: {accent};
        border-radius: 2px;
    }}
}}
"#,
        radius = palette.radius,
        accent = palette.accent,
        accent_pressed = palette.accent_pressed,
        background = palette.background,
        foreground = palette.foreground,
        border = palette.border,
        on_accent = lumen_ir::Color::WHITE,
    );
    out
}
