use std::fs;

#[macro_export]
macro_rules! parse_assert_eq {
    ($left:expr , $right:expr) => {
        assert_eq!(parse_blocks(&$left), $right);
    };
}

#[macro_export]
macro_rules! heading_tests {
    () => {
        seq_macro::seq!(N in 1..=6 {
            #[test]
            fn it_parses_heading_depth_~N() {
                let hashes = "#".repeat(N as usize);
                let text = format!("{hashes} Some Text");
                let level = (N as u8).min(3);
                let expected = vec![Block::Heading { level, text: String::from("Some Text") }];
                parse_assert_eq!(text, expected);
            }
        });
    };
}

pub fn load_markdown(file: &str) -> String {
    let file = format!("tests/markdown/{file}.md");
    read_to_string(&file)
}

fn read_to_string(file: &str) -> String {
    fs::read_to_string(file).unwrap_or_else(|_| panic!("could not find test file: {file}"))
}
