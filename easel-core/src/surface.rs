/// 可绘制的画布。像素怎么落地由宿主决定。
pub trait Surface {
    /// 逻辑尺寸 (宽, 高)
    fn size(&self) -> (f32, f32);

    fn clear(&mut self);

    fn draw_text(&mut self, text: &str, x: f32, y: f32);

    /// 失焦后由管理器调用，把键盘焦点抢回来
    fn request_focus(&mut self) {}
}
