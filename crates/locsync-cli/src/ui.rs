// Macros for user-facing output. Results go to stdout, notices to stderr.

#[macro_export]
macro_rules! ui_ok {
    ($($arg:tt)*) => {{
        println!("✔ {}", format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! ui_info {
    ($($arg:tt)*) => {{
        eprintln!("ℹ {}", format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! ui_warn {
    ($($arg:tt)*) => {{
        let show_icon = std::io::IsTerminal::is_terminal(&std::io::stderr())
            && std::env::var_os("NO_ICONS").is_none();
        if show_icon {
            eprintln!("⚠ {}", format_args!($($arg)*));
        } else {
            eprintln!("{}", format_args!($($arg)*));
        }
    }};
}

#[macro_export]
macro_rules! ui_err {
    ($($arg:tt)*) => {{
        eprintln!("✖ {}", format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! ui_out {
    ($($arg:tt)*) => {{
        println!("{}", format_args!($($arg)*));
    }};
}
