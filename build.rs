fn main() {
    println!("cargo:rerun-if-changed=assets/logo.ico");

    // The icon is optional branding; builds without it simply skip the resource.
    #[cfg(target_os = "windows")]
    {
        if std::path::Path::new("assets/logo.ico").exists() {
            let mut res = winres::WindowsResource::new();
            res.set_icon("assets/logo.ico");
            res.compile().expect("Failed to compile Windows resources");
        }
    }
}
