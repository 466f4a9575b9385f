fn main() {
    // Only embed Windows resources on Windows targets
    #[cfg(target_os = "windows")]
    {
        let mut res = winres::WindowsResource::new();
        res.set("FileDescription", "mdocx Markdown to Word Converter");
        res.set("ProductName", "mdocx");

        if let Err(e) = res.compile() {
            eprintln!("Warning: Failed to compile Windows resources: {}", e);
        }
    }
}
