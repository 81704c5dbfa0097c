fn main() -> anyhow::Result<()> {
    extern crate filter_view;

    filter_view::desktop_main()
}
